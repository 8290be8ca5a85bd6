//! Short-link codes for shareable recipe URLs.
//!
//! A code is 8 characters drawn from uppercase letters and digits,
//! generated from an unpredictable source on the first link request for a
//! recipe and immutable thereafter. Collisions are resolved by the caller
//! regenerating and retrying against the uniqueness constraint.

use rand::Rng;
use thiserror::Error;

/// Code length in characters.
pub const CODE_LEN: usize = 8;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Validation errors for short-link codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortLinkCodeError {
    /// Wrong length or a character outside `[A-Z0-9]`.
    #[error("short-link code must be {CODE_LEN} characters of A-Z0-9")]
    Malformed,
}

/// An 8-character alphanumeric short-link code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortLinkCode(String);

impl ShortLinkCode {
    /// Validate and wrap an incoming code, e.g. from a URL path segment.
    pub fn parse(raw: &str) -> Result<Self, ShortLinkCodeError> {
        let valid = raw.len() == CODE_LEN
            && raw.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            return Err(ShortLinkCodeError::Malformed);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Draw a fresh code from the supplied randomness source.
    ///
    /// Callers wanting cryptographic unpredictability pass
    /// [`rand::rngs::OsRng`].
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                char::from(CHARSET[idx])
            })
            .collect();
        Self(code)
    }

    /// Borrow the underlying code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ShortLinkCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    fn generated_codes_match_charset_and_length() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let code = ShortLinkCode::generate(&mut rng);
            assert!(ShortLinkCode::parse(code.as_str()).is_ok(), "{code}");
        }
    }

    #[rstest]
    #[case("ABCD1234", true)]
    #[case("abcd1234", false)]
    #[case("ABC123", false)]
    #[case("ABCD12345", false)]
    #[case("ABCD-234", false)]
    fn parse_enforces_shape(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(ShortLinkCode::parse(raw).is_ok(), ok);
    }
}
