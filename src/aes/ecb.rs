use openssl::symm::Mode as CrypterMode;

use crate::aes::{check_aligned, check_key, raw_ecb, BLOCK_SIZE};
use crate::error::Result;
use crate::pkcs7;

pub mod attack;

/// ECB: each block encrypted independently under the same key. With `pad`
/// off, the input must already be block-aligned.
pub fn ecb_encrypt(buf: &[u8], key: &[u8], pad: bool) -> Result<Vec<u8>> {
    check_key(key)?;
    let src = if pad {
        pkcs7::pad(buf, BLOCK_SIZE)
    } else {
        check_aligned(buf.len())?;
        buf.to_vec()
    };
    raw_ecb(CrypterMode::Encrypt, key, &src)
}

/// Inverse of [`ecb_encrypt`]; with `pad` on, validates and strips the
/// PKCS#7 tail.
pub fn ecb_decrypt(buf: &[u8], key: &[u8], pad: bool) -> Result<Vec<u8>> {
    check_key(key)?;
    check_aligned(buf.len())?;
    let out = raw_ecb(CrypterMode::Decrypt, key, buf)?;
    if pad {
        pkcs7::unpad(&out, BLOCK_SIZE)
    } else {
        Ok(out)
    }
}
