//! State codec - encode/decode MT19937 state buffers
//!
//! The encoded form is a flat, self-describing sequence of u32 words:
//!
//! ```text
//! | version | num_sections | state_length | ...words | other_length | cursor | seed_length | ...seed |
//! ```
//!
//! # Critical Invariants
//!
//! - **Exact length**: total length is `6 + state_length + seed_length`, never more or less
//! - **Validate first**: decode reports the first violated field and never corrects it
//! - **Variable seed**: the seed section may have any positive length

use thiserror::Error;

use super::mt19937::{TwistEngine, STATE_LENGTH};

/// Current state buffer schema version.
pub const STATE_ARRAY_VERSION: u32 = 1;

/// Sections: state, other (cursor), seed.
pub const NUM_STATE_SECTIONS: u32 = 3;

/// Index of the `state_length` field.
pub const STATE_SECTION_OFFSET: usize = 2;

/// Index of the `other_length` field.
pub const OTHER_SECTION_OFFSET: usize = STATE_LENGTH + 3;

/// Index of the `seed_length` field.
pub const SEED_SECTION_OFFSET: usize = STATE_LENGTH + 5;

/// Length of everything but the seed words.
pub const STATE_FIXED_LENGTH: usize = STATE_LENGTH + 6;

const OTHER_SECTION_LENGTH: u32 = 1;

/// Structural violations found while decoding a state buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("State buffer too short: need at least {min} words, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Unsupported state buffer version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("Invalid section count: expected {expected}, got {actual}")]
    SectionCount { expected: u32, actual: u32 },

    #[error("Invalid state section length: expected {expected}, got {actual}")]
    StateLength { expected: u32, actual: u32 },

    #[error("Invalid other section length: expected {expected}, got {actual}")]
    OtherLength { expected: u32, actual: u32 },

    #[error("Cursor {actual} out of range [0, {max}]")]
    CursorOutOfRange { max: u32, actual: u32 },

    #[error("Incompatible seed length: header declares {declared} words, buffer holds {available}")]
    IncompatibleSeedLength { declared: u32, available: usize },

    #[error("Seed section is empty")]
    EmptySeed,
}

impl StateError {
    /// Name of the buffer field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            StateError::TooShort { .. } => "length",
            StateError::UnsupportedVersion { .. } => "version",
            StateError::SectionCount { .. } => "num_sections",
            StateError::StateLength { .. } => "state_length",
            StateError::OtherLength { .. } => "other_length",
            StateError::CursorOutOfRange { .. } => "cursor",
            StateError::IncompatibleSeedLength { .. } | StateError::EmptySeed => "seed_length",
        }
    }
}

/// Borrowed view of a validated state buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedState<'a> {
    pub words: &'a [u32],
    pub cursor: usize,
    pub seed: &'a [u32],
}

/// Encode the full engine state
pub fn encode(engine: &TwistEngine) -> Vec<u32> {
    encode_parts(engine.words(), engine.cursor(), engine.seed().words())
}

/// Lay out words, cursor and seed in the encoded form.
pub(crate) fn encode_parts(words: &[u32], cursor: usize, seed: &[u32]) -> Vec<u32> {
    let mut buffer = Vec::with_capacity(STATE_FIXED_LENGTH + seed.len());
    buffer.push(STATE_ARRAY_VERSION);
    buffer.push(NUM_STATE_SECTIONS);
    buffer.push(STATE_LENGTH as u32);
    buffer.extend_from_slice(words);
    buffer.push(OTHER_SECTION_LENGTH);
    buffer.push(cursor as u32);
    buffer.push(seed.len() as u32);
    buffer.extend_from_slice(seed);
    buffer
}

/// Validate and decode a state buffer
///
/// Fields are checked in layout order; the first violation is returned.
///
/// # Example
/// ```
/// use mt_prng_core_rs::rng::{codec, Seed, TwistEngine};
///
/// let engine = TwistEngine::new(Seed::from_words(&[1, 2, 3]).unwrap());
/// let buffer = codec::encode(&engine);
/// let decoded = codec::decode(&buffer).unwrap();
/// assert_eq!(decoded.seed, &[1, 2, 3]);
/// assert_eq!(decoded.cursor, 624);
/// ```
pub fn decode(buffer: &[u32]) -> Result<DecodedState<'_>, StateError> {
    if buffer.len() < STATE_FIXED_LENGTH {
        return Err(StateError::TooShort {
            min: STATE_FIXED_LENGTH,
            actual: buffer.len(),
        });
    }
    if buffer[0] != STATE_ARRAY_VERSION {
        return Err(StateError::UnsupportedVersion {
            expected: STATE_ARRAY_VERSION,
            actual: buffer[0],
        });
    }
    if buffer[1] != NUM_STATE_SECTIONS {
        return Err(StateError::SectionCount {
            expected: NUM_STATE_SECTIONS,
            actual: buffer[1],
        });
    }
    if buffer[STATE_SECTION_OFFSET] != STATE_LENGTH as u32 {
        return Err(StateError::StateLength {
            expected: STATE_LENGTH as u32,
            actual: buffer[STATE_SECTION_OFFSET],
        });
    }
    if buffer[OTHER_SECTION_OFFSET] != OTHER_SECTION_LENGTH {
        return Err(StateError::OtherLength {
            expected: OTHER_SECTION_LENGTH,
            actual: buffer[OTHER_SECTION_OFFSET],
        });
    }
    let cursor = buffer[OTHER_SECTION_OFFSET + 1];
    if cursor > STATE_LENGTH as u32 {
        return Err(StateError::CursorOutOfRange {
            max: STATE_LENGTH as u32,
            actual: cursor,
        });
    }
    let declared = buffer[SEED_SECTION_OFFSET];
    let available = buffer.len() - STATE_FIXED_LENGTH;
    if declared as usize != available {
        return Err(StateError::IncompatibleSeedLength {
            declared,
            available,
        });
    }
    if declared == 0 {
        return Err(StateError::EmptySeed);
    }

    Ok(split_validated(buffer))
}

/// Slice an already-validated buffer into its sections.
pub(crate) fn split_validated(buffer: &[u32]) -> DecodedState<'_> {
    DecodedState {
        words: &buffer[STATE_SECTION_OFFSET + 1..OTHER_SECTION_OFFSET],
        cursor: buffer[OTHER_SECTION_OFFSET + 1] as usize,
        seed: &buffer[STATE_FIXED_LENGTH..],
    }
}

/// Seed words of an already-validated buffer.
pub(crate) fn seed_section(buffer: &[u32]) -> &[u32] {
    &buffer[STATE_FIXED_LENGTH..]
}

/// Draw the next word directly from an already-validated buffer.
pub(crate) fn draw_from_buffer(buffer: &mut [u32]) -> u32 {
    let (head, tail) = buffer.split_at_mut(OTHER_SECTION_OFFSET);
    let words = &mut head[STATE_SECTION_OFFSET + 1..];
    let slot = &mut tail[1];
    let mut cursor = *slot as usize;
    let value = super::mt19937::next_word(words, &mut cursor);
    *slot = cursor as u32;
    value
}
