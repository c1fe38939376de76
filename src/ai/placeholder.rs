//! Deterministic stand-in image URLs for failed image generation.

const PLACEHOLDER_HOST: &str = "https://picsum.photos";
const SEED_LEN: usize = 10;
const IMAGE_SIZE: u32 = 512;

/// Placeholder URL seeded from the first characters of the encoded prompt.
///
/// The seed is cut after encoding, so it may end partway through a `%XX`
/// escape.
pub fn placeholder_url(prompt: &str) -> String {
    let encoded = encode_uri_component(prompt);
    // Encoded output is pure ASCII, so byte slicing is char-safe.
    let seed = &encoded[..encoded.len().min(SEED_LEN)];
    format!(
        "{}/seed/{}/{}/{}",
        PLACEHOLDER_HOST, seed, IMAGE_SIZE, IMAGE_SIZE
    )
}

/// Percent-encodes UTF-8 bytes, leaving `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as is.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
