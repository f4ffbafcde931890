//! Generator handles
//!
//! The surface every sampler programs against. A [`GeneratorHandle`] is either
//! an introspectable [`Mt19937`] or an opaque [`ExternalPrng`]; both expose
//! `draw`, normalized draws and `to_json` through the [`Prng`] trait, and only
//! the MT19937 variant carries seed and state.
//!
//! # Critical Invariants
//!
//! 1. Same seed or state → same sequence
//! 2. A failed state assignment leaves the handle unchanged
//! 3. Handles are single-threaded (`!Send`); aliasing is explicit

use rand_core::{impls, Error as RandError, RngCore};
use thiserror::Error;

use crate::rng::{Seed, SeedError, StateError};

mod config;
mod export;
mod external;
mod mt19937;
mod normalized;
mod shared;

pub use config::{PrngConfig, PrngOptions, Source, StateInput};
pub use export::{revive, PrngJson, JSON_TYPE};
pub use external::ExternalPrng;
pub use mt19937::{Mt19937, NAME as MT19937_NAME};
pub use normalized::NormalizedView;
pub use shared::SharedState;

/// Errors raised by generator construction and state assignment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrngError {
    #[error("Invalid seed: {0}")]
    InvalidSeed(#[from] SeedError),

    #[error("Malformed state ({}): {0}", .0.field())]
    MalformedState(#[from] StateError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Common interface of all generator variants
pub trait Prng {
    /// Generator identifier
    fn name(&self) -> &'static str;

    /// Next unsigned 32-bit integer
    fn draw(&mut self) -> u32;

    /// Next double in [0, 1)
    fn draw_normalized(&mut self) -> f64;

    /// Portable export; `None` when the state cannot be captured
    fn to_json(&self) -> Option<PrngJson>;
}

/// Generator handle: introspectable MT19937 or opaque external source
///
/// # Example
/// ```
/// use mt_prng_core_rs::handle::{GeneratorHandle, PrngConfig, PrngOptions};
///
/// let config = PrngConfig::from_json_str(r#"{"seed": 1234}"#).unwrap();
/// let mut handle = GeneratorHandle::new(PrngOptions::try_from(config).unwrap()).unwrap();
///
/// assert_eq!(handle.seed().unwrap().words(), &[1234]);
/// assert_eq!(handle.draw(), 822_569_775);
/// assert_eq!(handle.state_length(), Some(631));
/// ```
#[derive(Debug)]
pub enum GeneratorHandle {
    Mt19937(Mt19937),
    External(ExternalPrng),
}

impl GeneratorHandle {
    /// Resolve options into a handle
    ///
    /// # Errors
    /// - `MalformedState` when a supplied state buffer fails validation
    pub fn new(options: PrngOptions) -> Result<Self, PrngError> {
        let PrngOptions { source, copy } = options;
        let handle = match source {
            Source::Entropy => GeneratorHandle::Mt19937(Mt19937::with_seed_and_copy(
                Seed::random(),
                copy,
            )),
            Source::Seed(seed) => {
                GeneratorHandle::Mt19937(Mt19937::with_seed_and_copy(seed, copy))
            }
            Source::State(state) => GeneratorHandle::Mt19937(Mt19937::from_state(state, copy)?),
            Source::External(source) => GeneratorHandle::External(ExternalPrng::new(source)),
        };
        Ok(handle)
    }

    /// Parse a JSON configuration and resolve it
    pub fn from_config_str(json: &str) -> Result<Self, PrngError> {
        let config = PrngConfig::from_json_str(json)?;
        Self::new(PrngOptions::try_from(config)?)
    }

    /// Rebuild from a JSON export
    pub fn from_json(json: &PrngJson) -> Result<Self, PrngError> {
        json.revive().map(GeneratorHandle::Mt19937)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorHandle::Mt19937(prng) => prng.name(),
            GeneratorHandle::External(prng) => prng.name(),
        }
    }

    pub fn draw(&mut self) -> u32 {
        match self {
            GeneratorHandle::Mt19937(prng) => prng.draw(),
            GeneratorHandle::External(prng) => prng.draw(),
        }
    }

    pub fn draw_normalized(&mut self) -> f64 {
        match self {
            GeneratorHandle::Mt19937(prng) => prng.draw_normalized(),
            GeneratorHandle::External(prng) => prng.draw_normalized(),
        }
    }

    /// Normalized view sharing this handle's state
    pub fn normalized(&self) -> NormalizedView {
        match self {
            GeneratorHandle::Mt19937(prng) => prng.normalized(),
            GeneratorHandle::External(prng) => prng.normalized(),
        }
    }

    /// The MT19937 variant, if this is one
    pub fn as_mt19937(&self) -> Option<&Mt19937> {
        match self {
            GeneratorHandle::Mt19937(prng) => Some(prng),
            GeneratorHandle::External(_) => None,
        }
    }

    pub fn seed(&self) -> Option<Seed> {
        self.as_mt19937().map(Mt19937::seed)
    }

    pub fn seed_length(&self) -> Option<usize> {
        self.as_mt19937().map(Mt19937::seed_length)
    }

    /// Defensive copy of the encoded state
    pub fn state(&self) -> Option<Vec<u32>> {
        self.as_mt19937().map(Mt19937::state)
    }

    /// Live state reference; only with `copy = false`
    pub fn state_ref(&self) -> Option<SharedState> {
        self.as_mt19937().and_then(Mt19937::state_ref)
    }

    /// Install a new encoded state; no-op for external sources
    pub fn set_state(&mut self, words: &[u32]) -> Result<(), PrngError> {
        match self {
            GeneratorHandle::Mt19937(prng) => prng.set_state(words),
            GeneratorHandle::External(_) => Ok(()),
        }
    }

    pub fn state_length(&self) -> Option<usize> {
        self.as_mt19937().map(Mt19937::state_length)
    }

    pub fn byte_length(&self) -> Option<usize> {
        self.as_mt19937().map(Mt19937::byte_length)
    }

    pub fn to_json(&self) -> Option<PrngJson> {
        self.as_mt19937().map(Mt19937::to_json)
    }
}

impl Prng for GeneratorHandle {
    fn name(&self) -> &'static str {
        GeneratorHandle::name(self)
    }

    fn draw(&mut self) -> u32 {
        GeneratorHandle::draw(self)
    }

    fn draw_normalized(&mut self) -> f64 {
        GeneratorHandle::draw_normalized(self)
    }

    fn to_json(&self) -> Option<PrngJson> {
        GeneratorHandle::to_json(self)
    }
}

impl RngCore for GeneratorHandle {
    fn next_u32(&mut self) -> u32 {
        self.draw()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.draw());
        let low = u64::from(self.draw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl From<Mt19937> for GeneratorHandle {
    fn from(prng: Mt19937) -> Self {
        GeneratorHandle::Mt19937(prng)
    }
}

impl From<ExternalPrng> for GeneratorHandle {
    fn from(prng: ExternalPrng) -> Self {
        GeneratorHandle::External(prng)
    }
}
