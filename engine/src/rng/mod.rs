//! Deterministic random number generation
//!
//! MT19937 engine, seed validation and the encoded state format.
//! CRITICAL: every MT19937 draw goes through `mt19937::next_word`.

pub mod codec;
mod mt19937;
mod seed;

pub use codec::{DecodedState, StateError};
pub use mt19937::{
    TwistEngine, MAX, MAX_NORMALIZED, MIN, MIN_NORMALIZED, STATE_LENGTH,
};
pub use seed::{Seed, SeedError, MAX_SEED};

pub(crate) use mt19937::normalize;
