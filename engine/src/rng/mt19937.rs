//! MT19937 32-bit Mersenne Twister
//!
//! The standard Matsumoto–Nishimura generator with period 2^19937 - 1.
//!
//! # Algorithm
//!
//! The engine keeps a 624-word buffer and a cursor. Every 624 draws the whole
//! buffer is regenerated ("twisted"), and each word is tempered on the way out.
//!
//! # Determinism
//!
//! Same seed → same sequence, on every platform. The constants below are the
//! reference ones; the known-answer tests in `tests/test_rng_determinism.rs`
//! pin them.

use rand_core::{impls, Error as RandError, RngCore};

use super::codec;
use super::seed::Seed;

/// Number of words in the twist buffer.
pub const STATE_LENGTH: usize = 624;

/// Offset of the word mixed into each twisted word.
const SHIFT_SIZE: usize = 397;

const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

const KNUTH_MULTIPLIER: u32 = 1_812_433_253;
const SEED_ARRAY_INIT_STATE: u32 = 19_650_218;
const SEED_ARRAY_MULTIPLIER_1: u32 = 1_664_525;
const SEED_ARRAY_MULTIPLIER_2: u32 = 1_566_083_941;

const TEMPERING_COEFFICIENT_1: u32 = 0x9d2c_5680;
const TEMPERING_COEFFICIENT_2: u32 = 0xefc6_0000;

/// 2^26, used to combine two draws into a 53-bit fraction.
const TWO_26: f64 = 67_108_864.0;

/// 1 / 2^53
const FLOAT64_NORMALIZATION_CONSTANT: f64 = 1.0 / 9_007_199_254_740_992.0;

/// Minimum value returned by an integer draw.
pub const MIN: u32 = 0;

/// Maximum value returned by an integer draw.
pub const MAX: u32 = u32::MAX;

/// Minimum value returned by a normalized draw.
pub const MIN_NORMALIZED: f64 = 0.0;

/// Maximum value returned by a normalized draw: (2^53 - 1) / 2^53.
pub const MAX_NORMALIZED: f64 = 9_007_199_254_740_991.0 * FLOAT64_NORMALIZATION_CONSTANT;

/// Fill `words` from a single 32-bit seed (linear-congruential recurrence).
pub(crate) fn init_state(words: &mut [u32], seed: u32) {
    words[0] = seed;
    for i in 1..words.len() {
        let prev = words[i - 1];
        words[i] = KNUTH_MULTIPLIER
            .wrapping_mul(prev ^ (prev >> 30))
            .wrapping_add(i as u32);
    }
}

/// Fill `words` from a multi-word key (array-seeding recurrence).
pub(crate) fn init_by_array(words: &mut [u32], key: &[u32]) {
    let n = words.len();
    init_state(words, SEED_ARRAY_INIT_STATE);

    let mut i = 1;
    let mut j = 0;
    for _ in 0..n.max(key.len()) {
        let s = words[i - 1] ^ (words[i - 1] >> 30);
        words[i] = (words[i] ^ s.wrapping_mul(SEED_ARRAY_MULTIPLIER_1))
            .wrapping_add(key[j])
            .wrapping_add(j as u32);
        i += 1;
        j += 1;
        if i >= n {
            words[0] = words[n - 1];
            i = 1;
        }
        if j >= key.len() {
            j = 0;
        }
    }
    for _ in 0..n - 1 {
        let s = words[i - 1] ^ (words[i - 1] >> 30);
        words[i] = (words[i] ^ s.wrapping_mul(SEED_ARRAY_MULTIPLIER_2)).wrapping_sub(i as u32);
        i += 1;
        if i >= n {
            words[0] = words[n - 1];
            i = 1;
        }
    }
    // MSB is 1, assuring a non-zero initial buffer
    words[0] = UPPER_MASK;
}

/// Seed `words` the way MT19937 does for `seed`.
pub(crate) fn seed_words(words: &mut [u32], seed: &Seed) {
    match seed.words() {
        [scalar] => init_state(words, *scalar),
        key => init_by_array(words, key),
    }
}

#[inline]
fn mix(current: u32, next: u32, far: u32) -> u32 {
    let y = (current & UPPER_MASK) | (next & LOWER_MASK);
    let mag = if y & 1 == 0 { 0 } else { MATRIX_A };
    far ^ (y >> 1) ^ mag
}

/// Regenerate all words of the buffer.
pub(crate) fn twist(words: &mut [u32]) {
    let n = words.len();
    let k = n - SHIFT_SIZE;
    for i in 0..k {
        words[i] = mix(words[i], words[i + 1], words[i + SHIFT_SIZE]);
    }
    for i in k..n - 1 {
        words[i] = mix(words[i], words[i + 1], words[i - k]);
    }
    words[n - 1] = mix(words[n - 1], words[0], words[SHIFT_SIZE - 1]);
    tracing::trace!("mt19937 buffer twisted");
}

#[inline]
pub(crate) fn temper(mut y: u32) -> u32 {
    y ^= y >> 11;
    y ^= (y << 7) & TEMPERING_COEFFICIENT_1;
    y ^= (y << 15) & TEMPERING_COEFFICIENT_2;
    y ^ (y >> 18)
}

/// Emit the next tempered word, twisting first when the cursor is exhausted.
#[inline]
pub(crate) fn next_word(words: &mut [u32], cursor: &mut usize) -> u32 {
    if *cursor >= STATE_LENGTH {
        twist(words);
        *cursor = 0;
    }
    let y = words[*cursor];
    *cursor += 1;
    temper(y)
}

/// Combine two integer draws into a 53-bit fraction in [0, 1).
#[inline]
pub(crate) fn normalize(high: u32, low: u32) -> f64 {
    let a = f64::from(high >> 5);
    let b = f64::from(low >> 6);
    (a * TWO_26 + b) * FLOAT64_NORMALIZATION_CONSTANT
}

/// Self-contained MT19937 engine
///
/// Owns its buffer outright. Handles that need shared, encodable state use
/// [`crate::handle::Mt19937`], which runs the same algorithm directly over an
/// encoded buffer.
///
/// # Example
/// ```
/// use mt_prng_core_rs::rng::{Seed, TwistEngine};
///
/// let mut engine = TwistEngine::new(Seed::from_scalar(1234).unwrap());
/// assert_eq!(engine.draw(), 822_569_775);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwistEngine {
    words: Box<[u32; STATE_LENGTH]>,
    cursor: usize,
    seed: Seed,
}

impl TwistEngine {
    /// Create an engine from a validated seed
    pub fn new(seed: Seed) -> Self {
        let mut words = Box::new([0u32; STATE_LENGTH]);
        seed_words(&mut words[..], &seed);
        Self {
            words,
            cursor: STATE_LENGTH,
            seed,
        }
    }

    /// Rebuild an engine from decoded parts.
    pub(crate) fn from_parts(words: &[u32], cursor: usize, seed: Seed) -> Self {
        let mut buffer = Box::new([0u32; STATE_LENGTH]);
        buffer.copy_from_slice(words);
        Self {
            words: buffer,
            cursor,
            seed,
        }
    }

    /// Rebuild an engine from an encoded state buffer
    ///
    /// # Errors
    /// Any structural violation of the buffer layout, see [`codec::decode`].
    pub fn from_state(buffer: &[u32]) -> Result<Self, codec::StateError> {
        let decoded = codec::decode(buffer)?;
        Ok(Self::from_parts(
            decoded.words,
            decoded.cursor,
            Seed::from_decoded(decoded.seed),
        ))
    }

    /// Re-seed in place, resetting the cursor.
    pub fn reseed(&mut self, seed: Seed) {
        seed_words(&mut self.words[..], &seed);
        self.cursor = STATE_LENGTH;
        self.seed = seed;
    }

    /// Next unsigned 32-bit integer in [0, 2^32 - 1]
    pub fn draw(&mut self) -> u32 {
        next_word(&mut self.words[..], &mut self.cursor)
    }

    /// Next double in [0, 1) with 53-bit precision
    ///
    /// Consumes exactly two integer draws.
    pub fn draw_normalized(&mut self) -> f64 {
        let high = self.draw();
        let low = self.draw();
        normalize(high, low)
    }

    /// The seed this engine was initialized with
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Index of the next word to emit; 624 means a twist is pending
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The raw (untempered) twist buffer
    pub fn words(&self) -> &[u32] {
        &self.words[..]
    }

    /// Encode the full state, see [`codec::encode`]
    pub fn to_state(&self) -> Vec<u32> {
        codec::encode(self)
    }
}

impl RngCore for TwistEngine {
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
