//! Secret comparison helpers.

/// Compares two secrets without short-circuiting on the first differing byte.
///
/// Length differences still return early; lengths are not secret here.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    constant_time_eq::constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_match_equal() {
        assert!(secrets_match("s3cret-admin-key", "s3cret-admin-key"));
    }

    #[test]
    fn test_secrets_match_different() {
        assert!(!secrets_match("s3cret-admin-key", "s3cret-admin-kez"));
        assert!(!secrets_match("s3cret-admin-key", "S3CRET-ADMIN-KEY"));
    }

    #[test]
    fn test_secrets_match_length_mismatch() {
        assert!(!secrets_match("short", "shorter"));
        assert!(!secrets_match("abc", ""));
    }

    #[test]
    fn test_secrets_match_empty() {
        assert!(secrets_match("", ""));
    }

    #[test]
    fn test_secrets_match_unicode() {
        assert!(secrets_match("clé-secrète", "clé-secrète"));
        assert!(!secrets_match("clé-secrète", "cle-secrete"));
    }
}
