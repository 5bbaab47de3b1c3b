//! Room code generation.
//!
//! Room codes are 5-character strings of uppercase letters and digits.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const ROOM_CODE_LEN: usize = 5;

/// Generate a room code from the given random source.
///
/// Uniqueness among live rooms is the caller's concern.
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Uppercase and trim user-typed codes.
pub fn normalize_room_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
