//! Per-registration access codes.
//!
//! An access code is the guest's credential for one event: 3 bytes from the
//! operating system CSPRNG rendered as 6 uppercase hexadecimal characters.

use rand::{rngs::OsRng, RngCore};

use crate::crypto::secrets_match;

/// Number of random bytes behind a code.
pub const ACCESS_CODE_BYTES: usize = 3;

/// Length of the rendered code.
pub const ACCESS_CODE_LEN: usize = ACCESS_CODE_BYTES * 2;

/// Generates a fresh access code, e.g. `"3FA09C"`.
pub fn generate_access_code() -> String {
    let mut bytes = [0u8; ACCESS_CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}

/// Normalises user input: surrounding whitespace removed, letters uppercased.
pub fn normalize_access_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Returns true when `code` has the canonical shape (6 uppercase hex chars).
pub fn is_well_formed(code: &str) -> bool {
    code.len() == ACCESS_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

/// Checks a guest-supplied code against the stored one.
///
/// The provided value is normalised first, so `" 3fa09c "` matches `"3FA09C"`.
/// Input that is not a well-formed code never matches.
pub fn verify_access_code(stored: &str, provided: &str) -> bool {
    let provided = normalize_access_code(provided);
    if !is_well_formed(&provided) {
        return false;
    }
    secrets_match(stored.trim(), &provided)
}
