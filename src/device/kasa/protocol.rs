//! Framing for the Kasa local protocol.
//!
//! Each message is a 4-byte big-endian length followed by the JSON payload
//! obfuscated with an XOR autokey cipher seeded with [`INITIAL_KEY`].

/// Seed of the autokey cipher.
pub const INITIAL_KEY: u8 = 171;
/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Obfuscate `payload` and prepend its length.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());

    let mut key = INITIAL_KEY;
    for byte in payload {
        key ^= byte;
        frame.push(key);
    }
    frame
}

/// Reverse the autokey cipher on a frame body (without the length prefix).
pub fn decode_body(body: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    body.iter()
        .map(|&byte| {
            let plain = key ^ byte;
            key = byte;
            plain
        })
        .collect()
}
