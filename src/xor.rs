pub mod attack;

/// XORs two buffers pairwise, truncating to the shorter input.
pub fn fixed_xor(buf1: &[u8], buf2: &[u8]) -> Vec<u8> {
    buf1.iter()
        .zip(buf2.iter())
        .map(|(x, y)| x ^ y)
        .collect()
}

#[test]
fn test_fixed_xor() {
    let case_buf1 = hex!("1c0111001f010100061a024b53535009181c");
    let case_buf2 = hex!("686974207468652062756c6c277320657965");
    let expected = hex!("746865206b696420646f6e277420706c6179");
    let result = fixed_xor(&case_buf1, &case_buf2);
    assert_eq!(result, expected);
}

pub fn single_byte_xor(buf: &[u8], key: u8) -> Vec<u8> {
    buf.iter()
        .map(|x| x ^ key)
        .collect()
}

#[test]
fn test_single_byte_xor_self_inverse() {
    let case = b"Anything at all, really";
    for key in [0u8, 0x20, 0x55, 0xff] {
        assert_eq!(single_byte_xor(&single_byte_xor(case, key), key), case);
    }
}

/// Vigenere-style XOR: byte `i` is XORed with `key[i % key.len()]`.
pub fn repeating_key_xor(buf: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(!key.is_empty());
    buf.iter()
        .enumerate()
        .map(|(i, x)| x ^ key[i % key.len()])
        .collect()
}

#[test]
fn test_repeating_key_xor() {
    let case = b"Burning 'em, if you ain't quick and nimble\nI go crazy when I hear a cymbal";
    let key = b"ICE";
    let encoded = repeating_key_xor(case, key);
    let expected = hex!("0b3637272a2b2e63622c2e69692a23693a2a3c6324202d623d63343c2a26226324272765272a282b2f20430a652e2c652a3124333a653e2b2027630c692b20283165286326302e27282f");
    assert_eq!(encoded, expected);
    assert_eq!(repeating_key_xor(&encoded, key), case);
}

/// Number of differing bits, over the common prefix of the two buffers.
pub fn hamming_distance(buf1: &[u8], buf2: &[u8]) -> u32 {
    buf1.iter()
        .zip(buf2.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

#[test]
fn test_hamming_distance() {
    assert_eq!(hamming_distance(b"this is a test", b"wokka wokka!!!"), 37);
}

pub fn normalised_hamming_distance(buf1: &[u8], buf2: &[u8]) -> f64 {
    hamming_distance(buf1, buf2) as f64 / buf1.len().min(buf2.len()) as f64
}
