use concat_arrays::concat_arrays;
use openssl::symm::Mode as CrypterMode;

use crate::aes::{check_key, raw_ecb, BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::xor;
use crate::xor::attack::break_single_byte_xor;

/// CTR: keystream block `i` is the encryption of `nonce ‖ le64(i)`, nonce in
/// the first eight bytes, counter little-endian in the last eight starting
/// at 0. The final partial block truncates to the remaining byte count.
pub fn ctr_encrypt(buf: &[u8], key: &[u8], nonce: u64) -> Result<Vec<u8>> {
    check_key(key)?;
    let mut out = Vec::with_capacity(buf.len());
    for (counter, block) in buf.chunks(BLOCK_SIZE).enumerate() {
        let counter_block: [u8; BLOCK_SIZE] =
            concat_arrays!(nonce.to_le_bytes(), (counter as u64).to_le_bytes());
        let keystream = raw_ecb(CrypterMode::Encrypt, key, &counter_block)?;
        out.extend(block.iter().zip(keystream.iter()).map(|(p, k)| p ^ k));
    }
    Ok(out)
}

/// CTR is XOR against a keystream, so decryption is the same operation.
pub fn ctr_decrypt(buf: &[u8], key: &[u8], nonce: u64) -> Result<Vec<u8>> {
    ctr_encrypt(buf, key, nonce)
}

/// Recovers a batch of CTR ciphertexts that reused one nonce, so every
/// message shares a keystream. Truncates to the shortest ciphertext, then
/// breaks each keystream byte column-wise as a single-byte XOR cipher.
pub fn attack_fixed_nonce_ctr(ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
    let min_len = ciphertexts
        .iter()
        .map(|c| c.len())
        .min()
        .ok_or(Error::AnalysisInconclusive)?;
    let mut keystream = Vec::with_capacity(min_len);
    for i in 0..min_len {
        let column: Vec<u8> = ciphertexts.iter().map(|c| c[i]).collect();
        let found = break_single_byte_xor(&column).ok_or(Error::AnalysisInconclusive)?;
        keystream.push(found.key);
    }
    Ok(ciphertexts
        .iter()
        .map(|c| xor::fixed_xor(&c[..min_len], &keystream))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    use crate::oracle::random_bytes;

    #[test]
    fn test_ctr_known_vector() {
        let ciphertext = general_purpose::STANDARD
            .decode("L77na/nrFsKvynd6HzOoG7GHTLXsTVu9qvY/2syLXzhPweyyMTJULu/6/kXX0KSvoOLSFQ==")
            .expect("Base64 decoding failed");
        let key = b"YELLOW SUBMARINE";
        let returned = ctr_decrypt(&ciphertext, key, 0).unwrap();
        assert_eq!(returned, b"Yo, VIP Let's kick it Ice, Ice, baby Ice, Ice, baby ");
    }

    #[test]
    fn test_ctr_round_trip_partial_block() {
        let key: [u8; 16] = random_bytes();
        let plaintext = b"seventeen bytes!!";
        let ciphertext = ctr_encrypt(plaintext, &key, 99).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());
        assert_eq!(ctr_decrypt(&ciphertext, &key, 99).unwrap(), plaintext);
        // A different nonce produces a different keystream.
        assert_ne!(ctr_encrypt(plaintext, &key, 100).unwrap(), ciphertext);
    }

    #[test]
    fn test_attack_fixed_nonce_ctr() {
        let lines: [&[u8]; 20] = [
            b"Now that the party is jumping with the bass kicked in",
            b"Quick to the point to the point no faking this is how",
            b"Cooking MC's like a pound of bacon and burning them up",
            b"Burning them if you ain't quick and nimble on the move",
            b"I go crazy when I hear a cymbal and a high hat with it",
            b"And a souped up tempo I'm on a roll and it's time to go",
            b"Rolling in my five point oh with the rag-top down so my",
            b"hair can blow the girlies on standby waving just to say",
            b"Did you stop no I just drove by and kept on flowing to",
            b"the next block where the speakers told the whole story",
            b"There was a time when all these rhymes were written in",
            b"a little black book that never left the writer's side",
            b"Every word was measured twice and spoken only when the",
            b"beat had made a proper space for it to land upon there",
            b"Nobody knew the record would be playing twenty summers",
            b"later in a kitchen while the dishes dried on the rack",
            b"Such is the fate of any tune that catches the right ear",
            b"at the right hour on the right evening of a long July",
            b"So raise the needle gently and return it to the start",
            b"because the song remembers everything we have forgotten",
        ];
        let key: [u8; 16] = random_bytes();
        let ciphertexts: Vec<Vec<u8>> = lines
            .iter()
            .map(|l| ctr_encrypt(l, &key, 0).unwrap())
            .collect();

        let recovered = attack_fixed_nonce_ctr(&ciphertexts).unwrap();
        // Column statistics are thin with only twenty samples, so allow the
        // occasional miss but require the bulk of the bytes back.
        let min_len = recovered[0].len();
        let total = recovered.len() * min_len;
        let correct: usize = recovered
            .iter()
            .zip(lines.iter())
            .map(|(got, want)| {
                got.iter().zip(want[..min_len].iter()).filter(|(g, w)| g == w).count()
            })
            .sum();
        assert!(
            correct * 10 >= total * 7,
            "recovered only {correct} of {total} bytes"
        );
    }
}
