use base64::{engine::general_purpose, Engine as _};
use rand::{Rng, RngCore};

use crate::aes::cbc::{cbc_decrypt, cbc_encrypt};
use crate::aes::ecb::ecb_encrypt;
use crate::aes::{BLOCK_SIZE, KEY_SIZE};
use crate::error::Result;

/// Shape of an encryption oracle as the attack engines see it: an opaque
/// function from plaintext to ciphertext.
pub trait Oracle: Fn(&[u8]) -> Vec<u8> {}
impl<T: Fn(&[u8]) -> Vec<u8>> Oracle for T {}

pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut data = [0u8; N];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

/// Simulates a server that commits to either ECB or CBC at random and then
/// encrypts whatever it is handed, wrapped in a little random padding.
/// The mode choice is fixed at construction so a detector can be scored
/// against it.
pub struct ModeOracle {
    key: [u8; KEY_SIZE],
    iv: [u8; BLOCK_SIZE],
    use_cbc: bool,
}

impl ModeOracle {
    pub fn new() -> Self {
        ModeOracle {
            key: random_bytes(),
            iv: random_bytes(),
            use_cbc: rand::thread_rng().gen(),
        }
    }

    pub fn is_ecb(&self) -> bool {
        !self.use_cbc
    }

    /// Encrypts 5-10 random bytes, the input, then 5-10 more random bytes,
    /// under the committed mode.
    pub fn encrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand::thread_rng();
        let affix = |rng: &mut rand::rngs::ThreadRng| -> Vec<u8> {
            let n = rng.gen_range(5..=10);
            (0..n).map(|_| rng.gen()).collect()
        };
        let data = [affix(&mut rng), input.to_vec(), affix(&mut rng)].concat();
        if self.use_cbc {
            cbc_encrypt(&data, &self.key, &self.iv, true)
        } else {
            ecb_encrypt(&data, &self.key, true)
        }
    }
}

impl Default for ModeOracle {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulates a server that appends a secret suffix to attacker input and
/// ECB-encrypts the result under a fixed unknown key.
pub struct EcbSuffixOracle {
    key: [u8; KEY_SIZE],
    suffix: Vec<u8>,
}

impl EcbSuffixOracle {
    pub fn new(suffix: Vec<u8>) -> Self {
        EcbSuffixOracle { key: random_bytes(), suffix }
    }

    pub fn encrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        let data = [input, &self.suffix].concat();
        ecb_encrypt(&data, &self.key, true)
    }
}

/// Token fixtures for [`CbcPaddingOracle`], base64-encoded.
static TOKENS: [&str; 10] = [
    "MDAwMDAwTm93IHRoYXQgdGhlIHBhcnR5IGlzIGp1bXBpbmc=",
    "MDAwMDAxV2l0aCB0aGUgYmFzcyBraWNrZWQgaW4gYW5kIHRoZSBWZWdhJ3MgYXJlIHB1bXBpbic=",
    "MDAwMDAyUXVpY2sgdG8gdGhlIHBvaW50LCB0byB0aGUgcG9pbnQsIG5vIGZha2luZw==",
    "MDAwMDAzQ29va2luZyBNQydzIGxpa2UgYSBwb3VuZCBvZiBiYWNvbg==",
    "MDAwMDA0QnVybmluZyAnZW0sIGlmIHlvdSBhaW4ndCBxdWljayBhbmQgbmltYmxl",
    "MDAwMDA1SSBnbyBjcmF6eSB3aGVuIEkgaGVhciBhIGN5bWJhbA==",
    "MDAwMDA2QW5kIGEgaGlnaCBoYXQgd2l0aCBhIHNvdXBlZCB1cCB0ZW1wbw==",
    "MDAwMDA3SSdtIG9uIGEgcm9sbCwgaXQncyB0aW1lIHRvIGdvIHNvbG8=",
    "MDAwMDA4b2xsaW4nIGluIG15IGZpdmUgcG9pbnQgb2g=",
    "MDAwMDA5aXRoIG15IHJhZy10b3AgZG93biBzbyBteSBoYWlyIGNhbiBibG93",
];

/// Simulates the vulnerable server behind a padding-oracle attack: it
/// encrypts one of its tokens under a fixed unknown key with a fresh IV,
/// and will tell anyone whether a ciphertext decrypts to valid padding.
pub struct CbcPaddingOracle {
    key: [u8; KEY_SIZE],
    tokens: Vec<Vec<u8>>,
}

impl CbcPaddingOracle {
    pub fn new() -> Self {
        let tokens = TOKENS
            .iter()
            .map(|t| {
                general_purpose::STANDARD
                    .decode(t)
                    .expect("token fixture is valid base64")
            })
            .collect();
        CbcPaddingOracle { key: random_bytes(), tokens }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Plaintext of a token, for test verification only; the attack engine
    /// never sees this.
    pub fn token(&self, index: usize) -> &[u8] {
        &self.tokens[index]
    }

    /// CBC-encrypts the chosen token under the oracle's key with a fresh
    /// random IV, returning both.
    pub fn encrypt_token(&self, index: usize) -> Result<(Vec<u8>, [u8; BLOCK_SIZE])> {
        let iv: [u8; BLOCK_SIZE] = random_bytes();
        let ciphertext = cbc_encrypt(&self.tokens[index], &self.key, &iv, true)?;
        Ok((ciphertext, iv))
    }

    /// The leak: true iff `ciphertext` decrypts under `iv` to valid PKCS#7
    /// padding. This single bit is all the attack engine gets.
    pub fn check_padding(&self, ciphertext: &[u8], iv: &[u8]) -> bool {
        cbc_decrypt(ciphertext, &self.key, iv, true).is_ok()
    }
}

impl Default for CbcPaddingOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_oracle_commits_to_one_mode() {
        let oracle = ModeOracle::new();
        let first = oracle.is_ecb();
        for _ in 0..5 {
            assert_eq!(oracle.is_ecb(), first);
            assert!(!oracle.encrypt(b"hello").unwrap().is_empty());
        }
    }

    #[test]
    fn test_padding_oracle_accepts_its_own_ciphertext() {
        let oracle = CbcPaddingOracle::new();
        for index in 0..oracle.token_count() {
            let (ciphertext, iv) = oracle.encrypt_token(index).unwrap();
            assert!(oracle.check_padding(&ciphertext, &iv));
            // Flipping high bits in the predecessor of the final block
            // drives the declared pad value past 16, which can never be
            // valid.
            let mut mangled = ciphertext.clone();
            let n = mangled.len();
            mangled[n - BLOCK_SIZE - 1] ^= 0x55;
            assert!(!oracle.check_padding(&mangled, &iv));
        }
    }

    #[test]
    fn test_suffix_oracle_length() {
        let oracle = EcbSuffixOracle::new(b"secret".to_vec());
        let ciphertext = oracle.encrypt(b"hello").unwrap();
        assert_eq!(ciphertext.len() % BLOCK_SIZE, 0);
        assert!(ciphertext.len() > b"hellosecret".len());
    }
}
