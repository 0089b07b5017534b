use crate::aes::BLOCK_SIZE;
use crate::error::{NotBlockAlignedSnafu, OracleExhaustedSnafu, Result};
use snafu::ensure;

/// Recovers CBC plaintext with nothing but a padding-validity oracle.
///
/// Works one ciphertext block at a time against a mutable copy of its true
/// predecessor (`iv` for block 0). For target padding value `p` from 1 to
/// 16, every already-solved byte of `prev` is first transitioned with
/// `(p-1) ^ p` so the decryption presents `p` at those positions, then all
/// 256 candidates are toggled into the byte under attack until the oracle
/// accepts. An accepted toggle stays in place: it is what presents `p` for
/// the next round's transition. The recovered plaintext byte is `p ^ u`.
///
/// The returned buffer is the raw decryption, trailing PKCS#7 padding
/// included; strip it with `pkcs7::unpad` as real decryption would.
pub fn attack_cbc_padding(
    ciphertext: &[u8],
    iv: &[u8; BLOCK_SIZE],
    oracle: &impl Fn(&[u8], &[u8]) -> bool,
) -> Result<Vec<u8>> {
    ensure!(
        !ciphertext.is_empty() && ciphertext.len() % BLOCK_SIZE == 0,
        NotBlockAlignedSnafu { len: ciphertext.len(), block_size: BLOCK_SIZE }
    );
    let mut cleartext = vec![0u8; ciphertext.len()];
    let mut prev = *iv;
    for (block_idx, block) in ciphertext.chunks(BLOCK_SIZE).enumerate() {
        let offset = block_idx * BLOCK_SIZE;
        for i in (0..BLOCK_SIZE).rev() {
            let padding = (BLOCK_SIZE - i) as u8;
            // Solved bytes currently present padding - 1; move them to
            // padding before searching the next position.
            let trans = (padding - 1) ^ padding;
            for byte in &mut prev[i + 1..] {
                *byte ^= trans;
            }
            let mut found = false;
            for u in 0..=u8::MAX {
                prev[i] ^= u;
                if oracle(block, &prev) {
                    if padding == 1 && i > 0 {
                        // A coincidental ..02 02 tail also satisfies the
                        // oracle here. Disturb the byte to the left: real
                        // 01 padding survives, the imposter does not.
                        prev[i - 1] ^= 1;
                        let still_valid = oracle(block, &prev);
                        prev[i - 1] ^= 1;
                        if !still_valid {
                            prev[i] ^= u;
                            continue;
                        }
                    }
                    cleartext[offset + i] = padding ^ u;
                    found = true;
                    break;
                }
                prev[i] ^= u;
            }
            ensure!(found, OracleExhaustedSnafu { block: block_idx, position: i });
        }
        prev.copy_from_slice(block);
    }
    Ok(cleartext)
}
