//! Generator configuration
//!
//! [`PrngOptions`] is the programmatic form: exactly one [`Source`] plus the
//! copy policy. [`PrngConfig`] is the declarative form parsed from JSON, which
//! converts into `PrngOptions` after validation.

use std::fmt;

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::shared::SharedState;
use super::PrngError;
use crate::rng::Seed;

/// Where a generator's draws come from
pub enum Source {
    /// Seed from the thread-local entropy source
    Entropy,

    /// Seed explicitly
    Seed(Seed),

    /// Resume from an encoded state buffer
    State(StateInput),

    /// Opaque caller-supplied source; state cannot be introspected
    External(Box<dyn RngCore>),
}

/// Encoded state supplied at construction
#[derive(Debug, Clone)]
pub enum StateInput {
    /// Plain words; always copied into a fresh buffer
    Words(Vec<u32>),

    /// A shared buffer; aliased when the copy policy is off
    Shared(SharedState),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Entropy => f.write_str("Entropy"),
            Source::Seed(seed) => f.debug_tuple("Seed").field(seed).finish(),
            Source::State(state) => f.debug_tuple("State").field(state).finish(),
            Source::External(_) => f.write_str("External(..)"),
        }
    }
}

/// Construction options for a generator handle
///
/// # Example
/// ```
/// use mt_prng_core_rs::handle::{GeneratorHandle, PrngOptions};
/// use mt_prng_core_rs::rng::Seed;
///
/// let options = PrngOptions::seeded(Seed::from_scalar(1234).unwrap()).with_copy(false);
/// let mut handle = GeneratorHandle::new(options).unwrap();
/// assert_eq!(handle.draw(), 822_569_775);
/// ```
#[derive(Debug)]
pub struct PrngOptions {
    pub source: Source,

    /// Defensive copy of state on read and on shared construction (default true)
    pub copy: bool,
}

impl Default for PrngOptions {
    fn default() -> Self {
        Self {
            source: Source::Entropy,
            copy: true,
        }
    }
}

impl PrngOptions {
    pub fn seeded(seed: Seed) -> Self {
        Self {
            source: Source::Seed(seed),
            ..Self::default()
        }
    }

    pub fn from_state(words: Vec<u32>) -> Self {
        Self {
            source: Source::State(StateInput::Words(words)),
            ..Self::default()
        }
    }

    /// Build over a shared buffer; pair with `with_copy(false)` to alias it
    pub fn shared(state: SharedState) -> Self {
        Self {
            source: Source::State(StateInput::Shared(state)),
            ..Self::default()
        }
    }

    pub fn external<R: RngCore + 'static>(source: R) -> Self {
        Self {
            source: Source::External(Box::new(source)),
            ..Self::default()
        }
    }

    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }
}

/// Declarative configuration, e.g. `{"seed": 1234, "copy": false}`
///
/// `seed` may be a positive integer or a non-empty array of integers;
/// `state` is an encoded buffer as a plain array. At most one of the two may
/// be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrngConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<bool>,
}

impl PrngConfig {
    /// Parse from a JSON string
    ///
    /// # Errors
    /// `InvalidConfiguration` when the JSON is not an object of the expected
    /// shape (unknown keys, a non-boolean `copy`, non-u32 state words).
    pub fn from_json_str(json: &str) -> Result<Self, PrngError> {
        serde_json::from_str(json)
            .map_err(|e| PrngError::InvalidConfiguration(format!("Config parse failed: {}", e)))
    }
}

impl TryFrom<PrngConfig> for PrngOptions {
    type Error = PrngError;

    fn try_from(config: PrngConfig) -> Result<Self, Self::Error> {
        let source = match (config.seed, config.state) {
            (Some(_), Some(_)) => {
                return Err(PrngError::InvalidConfiguration(
                    "seed and state are mutually exclusive".to_string(),
                ))
            }
            (Some(seed), None) => Source::Seed(Seed::from_json(&seed)?),
            (None, Some(state)) => Source::State(StateInput::Words(state)),
            (None, None) => Source::Entropy,
        };

        Ok(PrngOptions {
            source,
            copy: config.copy.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeedError;

    #[test]
    fn test_default_options() {
        let options = PrngOptions::default();
        assert!(options.copy);
        assert!(matches!(options.source, Source::Entropy));
    }

    #[test]
    fn test_config_seed_and_copy() {
        let config = PrngConfig::from_json_str(r#"{"seed": [1, 2], "copy": false}"#).unwrap();
        let options = PrngOptions::try_from(config).unwrap();
        assert!(!options.copy);
        match options.source {
            Source::Seed(seed) => assert_eq!(seed.words(), &[1, 2]),
            other => panic!("expected seed source, got {:?}", other),
        }
    }

    #[test]
    fn test_config_rejects_seed_with_state() {
        let config = PrngConfig {
            seed: Some(Value::from(1)),
            state: Some(vec![1]),
            copy: None,
        };
        assert!(matches!(
            PrngOptions::try_from(config),
            Err(PrngError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_config_non_boolean_copy() {
        let err = PrngConfig::from_json_str(r#"{"copy": "yes"}"#).unwrap_err();
        assert!(matches!(err, PrngError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_config_unknown_key() {
        let err = PrngConfig::from_json_str(r#"{"prng": 3}"#).unwrap_err();
        assert!(matches!(err, PrngError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_config_bad_seed_is_invalid_seed() {
        let config = PrngConfig::from_json_str(r#"{"seed": 0}"#).unwrap();
        assert_eq!(
            PrngOptions::try_from(config).unwrap_err(),
            PrngError::InvalidSeed(SeedError::NotPositive(0))
        );
    }
}
