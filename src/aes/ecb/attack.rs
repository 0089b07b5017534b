use crate::detect::detect_block_size;
use crate::oracle::Oracle;

/// Byte-at-a-time recovery of the secret suffix behind an ECB oracle of the
/// form `E(input ‖ secret)`.
///
/// A filler one byte short of a block boundary pulls exactly one unknown
/// byte into the block under attack; encrypting the filler plus every known
/// byte plus each of the 256 candidates builds a dictionary that names it.
/// The last recovered byte is always the first padding byte and is dropped.
pub fn attack_ecb_suffix(oracle: &dyn Oracle) -> Vec<u8> {
    let ciphertext_len = oracle(&[]).len();
    let block_size = detect_block_size(oracle);

    let mut known: Vec<u8> = Vec::new();
    'blocks: for block_idx in 0..ciphertext_len / block_size {
        let offset = block_idx * block_size;
        for i in 0..block_size {
            let filler = vec![b'A'; block_size - i - 1];
            let target = oracle(&filler)[offset..offset + block_size].to_vec();
            let mut matched = None;
            for candidate in 0..=u8::MAX {
                let mut probe = filler.clone();
                probe.extend_from_slice(&known);
                probe.push(candidate);
                let encrypted = oracle(&probe);
                if encrypted[offset..offset + block_size] == target[..] {
                    matched = Some(candidate);
                    break;
                }
            }
            match matched {
                Some(b) => known.push(b),
                // Past the end of the suffix the padding byte shifts under
                // us and nothing matches.
                None => break 'blocks,
            }
        }
    }
    known.pop();
    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::EcbSuffixOracle;

    #[test]
    fn test_attack_ecb_suffix() {
        let secret = b"Rollin' in my 5.0\nWith my rag-top down so my hair can blow";
        let oracle = EcbSuffixOracle::new(secret.to_vec());
        let encrypt = |input: &[u8]| oracle.encrypt(input).unwrap();
        assert_eq!(attack_ecb_suffix(&encrypt), secret);
    }

    #[test]
    fn test_attack_ecb_suffix_block_aligned_secret() {
        // A secret of exactly two blocks exercises the stop condition at a
        // block boundary.
        let secret = b"YELLOW SUBMARINEYELLOW SUBMARINE";
        let oracle = EcbSuffixOracle::new(secret.to_vec());
        let encrypt = |input: &[u8]| oracle.encrypt(input).unwrap();
        assert_eq!(attack_ecb_suffix(&encrypt), secret);
    }
}
