#[macro_use] extern crate hex_literal;

pub mod aes;
pub mod detect;
pub mod error;
pub mod oracle;
pub mod pkcs7;
pub mod xor;

pub use error::{Error, Result};
