use std::collections::HashSet;

use crate::oracle::Oracle;

/// First chunk that appears twice when `buf` is split into consecutive
/// `size`-byte chunks (the last chunk may be short). Returns the repeat's
/// chunk index and content.
pub fn repeating_block(buf: &[u8], size: usize) -> Option<(usize, Vec<u8>)> {
    let mut seen: HashSet<&[u8]> = HashSet::new();
    for (idx, chunk) in buf.chunks(size).enumerate() {
        if !seen.insert(chunk) {
            return Some((idx, chunk.to_vec()));
        }
    }
    None
}

#[test]
fn test_repeating_block() {
    let buf = b"aaabbbcccaaa";
    assert_eq!(repeating_block(buf, 3), Some((3, b"aaa".to_vec())));
    assert_eq!(repeating_block(buf, 4), None);
}

/// ECB fingerprint: identical plaintext blocks encrypt to identical
/// ciphertext blocks, so any duplicate fixed-size chunk betrays the mode.
pub fn has_duplicate_blocks(buf: &[u8], block_size: usize) -> bool {
    repeating_block(buf, block_size).is_some()
}

/// Probes an encryption oracle for its block size: grow a filler input and
/// watch the ciphertext length; it steps by exactly one block.
pub fn detect_block_size(oracle: &dyn Oracle) -> usize {
    let initial_size = oracle(&[]).len();
    let mut input: Vec<u8> = Vec::new();
    while oracle(&input).len() == initial_size {
        input.push(b'A');
    }
    let first_step = input.len();
    let stepped_size = oracle(&input).len();
    while oracle(&input).len() == stepped_size {
        input.push(b'A');
    }
    input.len() - first_step
}

/// Classifies an oracle as ECB or not by feeding it four identical blocks:
/// whatever prefix or suffix the oracle adds, at least two input blocks
/// stay aligned and encrypt identically under ECB, while CBC chaining makes
/// every ciphertext block distinct.
pub fn detect_ecb(oracle: &dyn Oracle, block_size: usize) -> bool {
    let probe = vec![b'A'; 4 * block_size];
    has_duplicate_blocks(&oracle(&probe), block_size)
}
