//! Seed values
//!
//! A seed is a non-empty sequence of 32-bit words. A scalar seed is the
//! length-1 sequence, so every seed has one canonical form.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Largest accepted seed word.
pub const MAX_SEED: u64 = u32::MAX as u64;

/// Errors produced while validating a seed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeedError {
    #[error("Seed must be an integer, got {0}")]
    NonInteger(String),

    #[error("Seed must be a positive integer, got {0}")]
    NotPositive(i128),

    #[error("Seed {value} exceeds the maximum of {max}")]
    OutOfRange { value: i128, max: u64 },

    #[error("Seed sequence must contain at least one word")]
    Empty,

    #[error("Seed word at index {index} is invalid: {value}")]
    InvalidWord { index: usize, value: String },
}

/// Canonical seed: one or more u32 words
///
/// # Example
/// ```
/// use mt_prng_core_rs::rng::Seed;
///
/// let scalar = Seed::from_scalar(1234).unwrap();
/// let single = Seed::from_words(&[1234]).unwrap();
/// assert_eq!(scalar, single);
/// assert_eq!(scalar.words(), &[1234]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u32>")]
pub struct Seed(Vec<u32>);

impl Seed {
    /// Scalar seed: a positive integer no larger than 2^32 - 1
    pub fn from_scalar(value: u64) -> Result<Self, SeedError> {
        check_scalar(i128::from(value)).map(|word| Seed(vec![word]))
    }

    /// Sequence seed
    ///
    /// A one-word sequence follows the scalar rules. Longer sequences accept
    /// any word in [0, 2^32 - 1].
    pub fn from_words(words: &[u64]) -> Result<Self, SeedError> {
        match words {
            [] => Err(SeedError::Empty),
            [scalar] => Self::from_scalar(*scalar),
            _ => words
                .iter()
                .enumerate()
                .map(|(index, &word)| {
                    u32::try_from(word).map_err(|_| SeedError::InvalidWord {
                        index,
                        value: word.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Seed),
        }
    }

    /// Seed from a JSON number or array of numbers
    pub fn from_json(value: &Value) -> Result<Self, SeedError> {
        match value {
            Value::Array(items) => match items.as_slice() {
                [] => Err(SeedError::Empty),
                [single] => Self::from_json(single),
                _ => {
                    let mut words = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        let word = json_integer(item)
                            .and_then(|w| u32::try_from(w).ok())
                            .ok_or_else(|| SeedError::InvalidWord {
                                index,
                                value: item.to_string(),
                            })?;
                        words.push(word);
                    }
                    Ok(Seed(words))
                }
            },
            Value::Number(number) => match json_integer(value) {
                Some(v) => check_scalar(v).map(|w| Seed(vec![w])),
                None => Err(SeedError::NonInteger(number.to_string())),
            },
            other => Err(SeedError::NonInteger(other.to_string())),
        }
    }

    /// Fresh seed drawn from the thread-local entropy source
    pub fn random() -> Self {
        Seed(vec![rand::thread_rng().gen_range(1..=u32::MAX)])
    }

    /// Seed words read back from a decoded state buffer.
    pub(crate) fn from_decoded(words: &[u32]) -> Self {
        Seed(words.to_vec())
    }

    /// Seed words
    pub fn words(&self) -> &[u32] {
        &self.0
    }

    /// Number of seed words (never zero)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Integer value of a JSON number; whole-valued floats such as `1234.0` count.
fn json_integer(value: &Value) -> Option<i128> {
    if let Some(v) = value.as_u64() {
        return Some(i128::from(v));
    }
    if let Some(v) = value.as_i64() {
        return Some(i128::from(v));
    }
    // `as` saturates, so huge floats still fail the range check
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i128)
}

fn check_scalar(value: i128) -> Result<u32, SeedError> {
    if value <= 0 {
        return Err(SeedError::NotPositive(value));
    }
    u32::try_from(value).map_err(|_| SeedError::OutOfRange {
        value,
        max: MAX_SEED,
    })
}

impl TryFrom<Vec<u64>> for Seed {
    type Error = SeedError;

    fn try_from(words: Vec<u64>) -> Result<Self, Self::Error> {
        Seed::from_words(&words)
    }
}

impl From<Seed> for Vec<u32> {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}
