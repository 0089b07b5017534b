use snafu::Snafu;

/// Crate-wide error taxonomy. Size errors, padding errors, estimation
/// failures and oracle exhaustion are distinct variants so callers can tell
/// "decryption ran, padding invalid" apart from "operation could not run".
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("bad key size: expected {expected} bytes, got {actual}"))]
    BadKeySize { expected: usize, actual: usize },

    #[snafu(display("bad iv size: expected {expected} bytes, got {actual}"))]
    BadIvSize { expected: usize, actual: usize },

    #[snafu(display("input length {len} is not a multiple of the {block_size}-byte block size"))]
    NotBlockAligned { len: usize, block_size: usize },

    #[snafu(display("invalid pkcs#7 padding"))]
    InvalidPadding,

    #[snafu(display("no viable key size in [2, 40)"))]
    KeySizeNotFound,

    #[snafu(display("no key bytes could be recovered from the ciphertext"))]
    AnalysisInconclusive,

    #[snafu(display("padding oracle accepted no candidate at block {block}, byte {position}"))]
    OracleExhausted { block: usize, position: usize },

    #[snafu(display("block cipher failure"))]
    #[snafu(context(false))]
    Cipher { source: openssl::error::ErrorStack },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
