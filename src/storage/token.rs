//! Random filename tokens.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of the random part of a stored image filename.
pub const TOKEN_LENGTH: usize = 40;

/// Source of random filename tokens.
pub trait TokenGenerator: Send + Sync {
    /// Returns `len` characters drawn from `[A-Za-z0-9]`.
    fn generate(&self, len: usize) -> String;
}

/// Thread-RNG backed generator; 62^40 possible tokens at the default length.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericTokenGenerator;

impl TokenGenerator for AlphanumericTokenGenerator {
    fn generate(&self, len: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}
