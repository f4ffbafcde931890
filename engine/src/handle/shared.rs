//! Shared state buffers
//!
//! A [`SharedState`] is a reference-counted encoded state buffer. Handles built
//! over the same `SharedState` with the no-copy policy draw from one sequence.
//!
//! The buffer is `Rc<RefCell<_>>`: handles holding one are `!Send`, so sharing
//! a buffer across threads is rejected at compile time instead of racing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::rng::codec::{self, StateError};

/// Reference to one mutable encoded state buffer
///
/// Cloning a `SharedState` clones the reference, not the words.
///
/// # Example
/// ```
/// use mt_prng_core_rs::handle::{Mt19937, SharedState};
/// use mt_prng_core_rs::rng::Seed;
///
/// let source = Mt19937::with_seed(Seed::from_scalar(1234).unwrap());
/// let shared = SharedState::new(source.state()).unwrap();
/// let alias = shared.clone();
/// assert!(shared.ptr_eq(&alias));
/// ```
#[derive(Clone)]
pub struct SharedState(Rc<RefCell<Vec<u32>>>);

impl SharedState {
    /// Wrap an encoded buffer after validating it
    pub fn new(words: Vec<u32>) -> Result<Self, StateError> {
        codec::decode(&words)?;
        Ok(Self::from_validated(words))
    }

    pub(crate) fn from_validated(words: Vec<u32>) -> Self {
        SharedState(Rc::new(RefCell::new(words)))
    }

    /// Number of words in the buffer
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Always false for a validated buffer
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Copy of the current words
    pub fn snapshot(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }

    /// Whether both references point at the same buffer
    pub fn ptr_eq(&self, other: &SharedState) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live references to this buffer
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Seed words currently stored in the buffer.
    pub(crate) fn seed_words(&self) -> Vec<u32> {
        codec::seed_section(&self.0.borrow()).to_vec()
    }

    /// Overwrite in place. Caller guarantees equal length and a valid buffer.
    pub(crate) fn overwrite(&self, words: &[u32]) {
        self.0.borrow_mut().copy_from_slice(words);
    }

    pub(crate) fn draw(&self) -> u32 {
        codec::draw_from_buffer(&mut self.0.borrow_mut())
    }
}

impl fmt::Debug for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedState")
            .field("len", &self.len())
            .field("holders", &self.holders())
            .finish()
    }
}
