use itertools::Itertools;

use crate::error::{Error, Result};
use crate::xor;

/// Relative frequency (percent) of each letter a-z in English prose.
static LETTER_FREQUENCIES: [f64; 26] = [
    8.34, 1.54, 2.73, 4.14, 12.60, 2.03, 1.92, 6.11, 6.71, 0.23, 0.87, 4.24, 2.53,
    6.80, 7.70, 1.66, 0.09, 5.68, 6.11, 9.37, 2.85, 1.06, 2.34, 0.20, 2.04, 0.06,
];

/// Scores a buffer for English-likeness as a relative log-likelihood:
/// the sum of `log10(frequency)` over alphabetic bytes, case-folded.
/// Any byte outside printable ASCII plus `\n`, `\r`, `\t` rejects the buffer
/// outright. Scores are only comparable within one evaluation run.
pub fn english_score(buf: &[u8]) -> Option<f64> {
    let printable = |b: u8| (32..=126).contains(&b) || b == b'\n' || b == b'\r' || b == b'\t';
    if !buf.iter().all(|&b| printable(b)) {
        return None;
    }
    Some(
        buf.iter()
            .filter(|b| b.is_ascii_alphabetic())
            .map(|b| LETTER_FREQUENCIES[(b.to_ascii_lowercase() - b'a') as usize].log10())
            .sum(),
    )
}

#[test]
fn test_english_score() {
    assert_eq!(english_score(b""), Some(0.0));
    assert_eq!(english_score(b"\x00\x01\x02"), None);
    assert_eq!(english_score(b"ok\x7f"), None);
    // Non-alphabetic bytes contribute nothing.
    assert_eq!(english_score(b" 0123 !?"), Some(0.0));
    let (lower, upper) = (english_score(b"etaoin").unwrap(), english_score(b"ETAOIN").unwrap());
    assert_eq!(lower, upper);
    assert!(english_score(b"eee").unwrap() > english_score(b"zzz").unwrap());
}

/// Winning candidate of a single-byte XOR brute force.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleByteKey {
    pub score: f64,
    pub key: u8,
    pub plaintext: Vec<u8>,
}

/// Tries all 256 single-byte keys and keeps the best-scoring candidate.
/// Ties keep the first maximum in ascending key order. `None` when every
/// candidate decryption is rejected as non-text.
pub fn break_single_byte_xor(buf: &[u8]) -> Option<SingleByteKey> {
    let mut best: Option<SingleByteKey> = None;
    for key in 0..=u8::MAX {
        let plaintext = xor::single_byte_xor(buf, key);
        if let Some(score) = english_score(&plaintext) {
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(SingleByteKey { score, key, plaintext });
            }
        }
    }
    best
}

#[test]
fn test_break_single_byte_xor() {
    let case = hex::decode("1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736")
        .expect("Hex decoding failed");
    let result = break_single_byte_xor(&case).unwrap();
    assert_eq!(result.plaintext, b"Cooking MC's like a pound of bacon");
    assert_eq!(result.key, b'X');
    assert_eq!(result.plaintext.len(), case.len());
}

#[test]
fn test_break_single_byte_xor_rejects_garbage() {
    // 0x00..=0xff: whatever key is applied, some byte lands outside the
    // printable range, so every candidate is rejected.
    let case: Vec<u8> = (0..=u8::MAX).collect();
    assert_eq!(break_single_byte_xor(&case), None);
}

/// Estimates the key length of a repeating-key XOR ciphertext.
///
/// For each candidate size in `[2, 40)` with at least four chunks of
/// ciphertext available, averages the six pairwise Hamming distances of the
/// first four chunks, normalized by the candidate size. The globally
/// smallest distance wins; same-key columns differ in fewer bits than
/// misaligned ones.
pub fn estimate_key_size(buf: &[u8]) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for ks in 2..40 {
        let chunks: Vec<&[u8]> = buf.chunks(ks).take(4).collect();
        if chunks.len() < 4 {
            continue;
        }
        let total: f64 = chunks
            .iter()
            .tuple_combinations()
            .map(|(a, b)| xor::hamming_distance(a, b) as f64)
            .sum();
        let dist = total / (6.0 * ks as f64);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((ks, dist));
        }
    }
    best.map(|(ks, _)| ks).ok_or(Error::KeySizeNotFound)
}

#[test]
fn test_estimate_key_size_needs_four_chunks() {
    assert!(matches!(estimate_key_size(b"short"), Err(Error::KeySizeNotFound)));
    assert!(matches!(estimate_key_size(b""), Err(Error::KeySizeNotFound)));
}

/// Recovers one key byte per position by transposing the ciphertext into
/// `key_size` columns (full groups only; a trailing partial group is
/// dropped) and brute-forcing each column as a single-byte XOR cipher.
/// Columns where no candidate survives are skipped.
pub fn recover_repeating_key(buf: &[u8], key_size: usize) -> Result<Vec<u8>> {
    let mut columns: Vec<Vec<u8>> = vec![Vec::new(); key_size];
    for group in buf.chunks_exact(key_size) {
        for (column, &b) in columns.iter_mut().zip(group.iter()) {
            column.push(b);
        }
    }
    let key: Vec<u8> = columns
        .iter()
        .filter_map(|column| break_single_byte_xor(column))
        .map(|found| found.key)
        .collect();
    if key.is_empty() {
        return Err(Error::AnalysisInconclusive);
    }
    Ok(key)
}

/// Result of a full repeating-key XOR break.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingKey {
    pub key: Vec<u8>,
    pub plaintext: Vec<u8>,
}

/// Breaks a repeating-key XOR ciphertext from statistics alone: estimate
/// the key size, recover the key column-wise, then decrypt the whole
/// buffer against the cycling key.
pub fn break_repeating_key_xor(buf: &[u8]) -> Result<RepeatingKey> {
    let key_size = estimate_key_size(buf)?;
    let key = recover_repeating_key(buf, key_size)?;
    let plaintext = xor::repeating_key_xor(buf, &key);
    Ok(RepeatingKey { key, plaintext })
}

#[cfg(test)]
static SAMPLE_TEXT: &[u8] = b"The night train rolled out of the yard a little after two, and the \
signalman watched it go with his lamp held high over his head. He had worked \
the junction for eleven years and he knew the sound of every engine that came \
through, the way a doctor knows the heartbeats of his patients. Tonight the \
rhythm was wrong. Somewhere behind the third car a coupling knocked twice on \
every turn of the wheels, a small complaint that nobody else would notice \
until it failed outside some distant town and left the whole line waiting in \
the dark.\nHe wrote it up in the log the way the rulebook asked, date and \
hour and direction, and then he sat a long while with the pen in his hand. \
The office smelled of coal smoke and cold tea. Out past the window the rails \
ran silver under the moon, two quiet lines of light reaching all the way to \
the river bridge, and he thought, as he often did at this hour, that a man \
could read the whole country from a chair like his if he only paid \
attention to what rolled past it.\nIn the morning the fitters would grumble \
and the foreman would sign the sheet without reading it, and the train would \
be twenty miles gone with its small knock keeping time. That was the shape \
of the work: you heard a thing, you wrote it down, you handed it on. Most of \
what a man guards he never sees broken, and if the line stayed whole nobody \
would ever know the difference, which suited the signalman fine. He banked \
the stove, took up his lamp again, and stepped out to meet the next one \
coming down.";

#[test]
fn test_estimate_key_size_recovers_known_lengths() {
    let key23 = b"dZ4!mQ9@pL2#sK8%vN6^bT0";
    assert_eq!(key23.len(), 23);
    let ciphertext = xor::repeating_key_xor(SAMPLE_TEXT, key23);
    assert_eq!(estimate_key_size(&ciphertext).unwrap(), 23);

    let key29 = b"Vexing wizards jump quickly 7";
    assert_eq!(key29.len(), 29);
    let ciphertext = xor::repeating_key_xor(SAMPLE_TEXT, key29);
    assert_eq!(estimate_key_size(&ciphertext).unwrap(), 29);
}

#[test]
fn test_break_repeating_key_xor() {
    let key = b"Vexing wizards jump quickly 7";
    let ciphertext = xor::repeating_key_xor(SAMPLE_TEXT, key);
    let result = break_repeating_key_xor(&ciphertext).unwrap();
    assert_eq!(result.key, key);
    assert_eq!(result.plaintext, SAMPLE_TEXT);
}

#[test]
fn test_recover_repeating_key_with_known_size() {
    let key = b"ICE";
    let ciphertext = xor::repeating_key_xor(SAMPLE_TEXT, key);
    let recovered = recover_repeating_key(&ciphertext, key.len()).unwrap();
    assert_eq!(recovered, key);
}
