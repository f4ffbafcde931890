//! Introspectable MT19937 handle
//!
//! Runs the engine directly over an encoded state buffer, so seed, state and
//! cursor are always read from (and written to) the encoded form.
//!
//! # Aliasing
//!
//! - Construction over a [`SharedState`] with `copy = false` aliases it.
//! - `set_state` with a buffer of the current length overwrites in place and
//!   keeps any aliasing.
//! - `set_state` with a different length installs a fresh buffer and severs
//!   aliasing for this handle only.

use std::cell::RefCell;
use std::rc::Rc;

use rand_core::{impls, Error as RandError, RngCore};
use tracing::debug;

use super::config::StateInput;
use super::export::PrngJson;
use super::normalized::NormalizedView;
use super::shared::SharedState;
use super::{Prng, PrngError};
use crate::rng::{codec, normalize, Seed, TwistEngine};

/// Generator identifier used in JSON exports.
pub const NAME: &str = "mt19937";

/// State common to a handle and its normalized view.
#[derive(Debug)]
pub(crate) struct TwisterCore {
    pub(crate) buffer: SharedState,
    pub(crate) copy: bool,
}

impl TwisterCore {
    pub(crate) fn draw(&self) -> u32 {
        self.buffer.draw()
    }

    pub(crate) fn draw_normalized(&self) -> f64 {
        let high = self.draw();
        let low = self.draw();
        normalize(high, low)
    }

    pub(crate) fn seed(&self) -> Seed {
        Seed::from_decoded(&self.buffer.seed_words())
    }

    pub(crate) fn state(&self) -> Vec<u32> {
        self.buffer.snapshot()
    }

    pub(crate) fn state_ref(&self) -> Option<SharedState> {
        if self.copy {
            None
        } else {
            Some(self.buffer.clone())
        }
    }

    /// Validate, then write through or replace the buffer.
    ///
    /// Nothing is mutated unless validation succeeds.
    pub(crate) fn set_state(&mut self, words: &[u32]) -> Result<(), PrngError> {
        codec::decode(words)?;
        if words.len() == self.buffer.len() {
            self.buffer.overwrite(words);
            debug!(
                len = words.len(),
                holders = self.buffer.holders(),
                "mt19937 state overwritten in place"
            );
        } else {
            let previous = self.buffer.len();
            self.buffer = SharedState::from_validated(words.to_vec());
            debug!(
                previous,
                len = words.len(),
                "mt19937 state length changed; installed unaliased buffer"
            );
        }
        Ok(())
    }

    pub(crate) fn to_json(&self) -> PrngJson {
        PrngJson::new(NAME, self.state(), Vec::new())
    }
}

/// MT19937 generator handle with seed/state introspection
///
/// # Example
/// ```
/// use mt_prng_core_rs::handle::Mt19937;
/// use mt_prng_core_rs::rng::Seed;
///
/// let mut rng = Mt19937::with_seed(Seed::from_scalar(1234).unwrap());
/// let saved = rng.state();
/// let a = rng.draw();
///
/// rng.set_state(&saved).unwrap();
/// assert_eq!(rng.draw(), a);
/// ```
#[derive(Debug)]
pub struct Mt19937 {
    core: Rc<RefCell<TwisterCore>>,
}

impl Mt19937 {
    fn from_buffer(buffer: SharedState, copy: bool) -> Self {
        debug!(
            len = buffer.len(),
            copy,
            holders = buffer.holders(),
            "mt19937 handle created"
        );
        Self {
            core: Rc::new(RefCell::new(TwisterCore { buffer, copy })),
        }
    }

    /// Seeded handle with the default (copying) policy
    pub fn with_seed(seed: Seed) -> Self {
        Self::with_seed_and_copy(seed, true)
    }

    pub(crate) fn with_seed_and_copy(seed: Seed, copy: bool) -> Self {
        let state = TwistEngine::new(seed).to_state();
        Self::from_buffer(SharedState::from_validated(state), copy)
    }

    /// Seeded from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::with_seed(Seed::random())
    }

    /// Resume from an encoded state
    ///
    /// `StateInput::Shared` with `copy = false` aliases the given buffer;
    /// every other combination starts from a private copy.
    ///
    /// # Errors
    /// `MalformedState` when the words fail validation.
    pub fn from_state(state: StateInput, copy: bool) -> Result<Self, PrngError> {
        let buffer = match state {
            StateInput::Words(words) => SharedState::new(words)?,
            StateInput::Shared(shared) if !copy => shared,
            StateInput::Shared(shared) => SharedState::from_validated(shared.snapshot()),
        };
        Ok(Self::from_buffer(buffer, copy))
    }

    /// Next unsigned 32-bit integer
    pub fn draw(&mut self) -> u32 {
        self.core.borrow().draw()
    }

    /// Next double in [0, 1); consumes two integer draws
    pub fn draw_normalized(&mut self) -> f64 {
        self.core.borrow().draw_normalized()
    }

    /// View producing doubles in [0, 1) over this handle's state
    pub fn normalized(&self) -> NormalizedView {
        NormalizedView::twister(Rc::clone(&self.core))
    }

    /// Canonical seed stored in the current state
    pub fn seed(&self) -> Seed {
        self.core.borrow().seed()
    }

    pub fn seed_length(&self) -> usize {
        self.core.borrow().buffer.seed_words().len()
    }

    /// Defensive copy of the encoded state
    pub fn state(&self) -> Vec<u32> {
        self.core.borrow().state()
    }

    /// Live reference to the encoded state
    ///
    /// `None` under the copy policy; with `copy = false` the returned buffer
    /// can be handed to other handles to alias this one.
    pub fn state_ref(&self) -> Option<SharedState> {
        self.core.borrow().state_ref()
    }

    /// Install a new encoded state
    ///
    /// # Errors
    /// `MalformedState`; the handle is left unchanged.
    pub fn set_state(&mut self, words: &[u32]) -> Result<(), PrngError> {
        self.core.borrow_mut().set_state(words)
    }

    /// Number of words in the encoded state
    pub fn state_length(&self) -> usize {
        self.core.borrow().buffer.len()
    }

    /// Number of bytes in the encoded state
    pub fn byte_length(&self) -> usize {
        self.state_length() * std::mem::size_of::<u32>()
    }

    /// Whether the copy policy is on
    pub fn copies(&self) -> bool {
        self.core.borrow().copy
    }

    /// Whether both handles currently share one state buffer
    pub fn aliases(&self, other: &Mt19937) -> bool {
        self.core.borrow().buffer.ptr_eq(&other.core.borrow().buffer)
    }

    pub fn to_json(&self) -> PrngJson {
        self.core.borrow().to_json()
    }

    /// Independent engine snapshot of the current state
    pub fn to_engine(&self) -> TwistEngine {
        let state = self.state();
        let decoded = codec::split_validated(&state);
        TwistEngine::from_parts(decoded.words, decoded.cursor, Seed::from_decoded(decoded.seed))
    }
}

impl Prng for Mt19937 {
    fn name(&self) -> &'static str {
        NAME
    }

    fn draw(&mut self) -> u32 {
        Mt19937::draw(self)
    }

    fn draw_normalized(&mut self) -> f64 {
        Mt19937::draw_normalized(self)
    }

    fn to_json(&self) -> Option<PrngJson> {
        Some(Mt19937::to_json(self))
    }
}

impl RngCore for Mt19937 {
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
