use openssl::symm::{Cipher, Crypter, Mode as CrypterMode};
use snafu::ensure;

use crate::error::{BadIvSizeSnafu, BadKeySizeSnafu, NotBlockAlignedSnafu, Result};

pub mod cbc;
pub mod ctr;
pub mod ecb;

/// AES-128 block width in bytes.
pub const BLOCK_SIZE: usize = 16;
/// AES-128 key width in bytes.
pub const KEY_SIZE: usize = 16;

/// Cipher mode with its per-mode parameters. The set is closed: CTR takes a
/// nonce rather than an IV, ECB takes neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cbc { iv: [u8; BLOCK_SIZE] },
    Ctr { nonce: u64 },
}

/// Encrypts under the given mode; the block modes apply PKCS#7 padding.
pub fn encrypt(mode: &Mode, buf: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    match mode {
        Mode::Ecb => ecb::ecb_encrypt(buf, key, true),
        Mode::Cbc { iv } => cbc::cbc_encrypt(buf, key, iv, true),
        Mode::Ctr { nonce } => ctr::ctr_encrypt(buf, key, *nonce),
    }
}

/// Decrypts under the given mode; the block modes validate and strip padding.
pub fn decrypt(mode: &Mode, buf: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    match mode {
        Mode::Ecb => ecb::ecb_decrypt(buf, key, true),
        Mode::Cbc { iv } => cbc::cbc_decrypt(buf, key, iv, true),
        Mode::Ctr { nonce } => ctr::ctr_decrypt(buf, key, *nonce),
    }
}

/// Raw AES-128-ECB with library padding disabled: the trusted single-block
/// primitive every mode is built from. Input must already be block-aligned.
pub(crate) fn raw_ecb(direction: CrypterMode, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = Cipher::aes_128_ecb();
    let mut crypter = Crypter::new(cipher, direction, key, None)?;
    crypter.pad(false);
    let mut out = vec![0u8; data.len() + cipher.block_size()];
    let mut n = crypter.update(data, &mut out)?;
    n += crypter.finalize(&mut out[n..])?;
    out.truncate(n);
    Ok(out)
}

pub(crate) fn check_key(key: &[u8]) -> Result<()> {
    ensure!(
        key.len() == KEY_SIZE,
        BadKeySizeSnafu { expected: KEY_SIZE, actual: key.len() }
    );
    Ok(())
}

pub(crate) fn check_iv(iv: &[u8]) -> Result<()> {
    ensure!(
        iv.len() == BLOCK_SIZE,
        BadIvSizeSnafu { expected: BLOCK_SIZE, actual: iv.len() }
    );
    Ok(())
}

pub(crate) fn check_aligned(len: usize) -> Result<()> {
    ensure!(
        len % BLOCK_SIZE == 0,
        NotBlockAlignedSnafu { len, block_size: BLOCK_SIZE }
    );
    Ok(())
}

#[cfg(test)]
mod mode_tests {
    use super::*;
    use crate::error::Error;
    use crate::oracle::random_bytes;

    #[test]
    fn test_mode_round_trips() {
        let key: [u8; KEY_SIZE] = random_bytes();
        let plaintext = b"The quick brown fox jumps over the lazy dog";
        let modes = [
            Mode::Ecb,
            Mode::Cbc { iv: random_bytes() },
            Mode::Ctr { nonce: 42 },
        ];
        for mode in &modes {
            let ciphertext = encrypt(mode, plaintext, &key).unwrap();
            assert_eq!(decrypt(mode, &ciphertext, &key).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_key_width_is_enforced() {
        let short_key = [0u8; 7];
        for mode in [Mode::Ecb, Mode::Cbc { iv: [0u8; BLOCK_SIZE] }, Mode::Ctr { nonce: 0 }] {
            assert!(matches!(
                encrypt(&mode, b"data", &short_key),
                Err(Error::BadKeySize { expected: KEY_SIZE, actual: 7 })
            ));
        }
    }
}
