//! Normalized view
//!
//! Doubles in [0, 1) drawn from the same state as the parent handle. Each
//! normalized draw consumes exactly two integer draws, so interleaving view and
//! parent draws yields one sequence.

use std::cell::RefCell;
use std::rc::Rc;

use super::export::PrngJson;
use super::external::{self, SourceCell};
use super::mt19937::TwisterCore;
use super::shared::SharedState;
use super::PrngError;
use crate::rng::{Seed, MAX_NORMALIZED, MIN_NORMALIZED};

enum Target {
    Twister(Rc<RefCell<TwisterCore>>),
    External(SourceCell),
}

/// Proxy over a generator handle producing doubles in [0, 1)
///
/// Seed and state accessors proxy the parent; they return `None` when the
/// parent wraps an external source.
///
/// # Example
/// ```
/// use mt_prng_core_rs::handle::Mt19937;
/// use mt_prng_core_rs::rng::Seed;
///
/// let rng = Mt19937::with_seed(Seed::from_scalar(1234).unwrap());
/// let mut uniform = rng.normalized();
/// assert_eq!(uniform.draw(), 0.1915194503788923);
/// ```
pub struct NormalizedView {
    target: Target,
}

impl NormalizedView {
    pub const MIN: f64 = MIN_NORMALIZED;
    pub const MAX: f64 = MAX_NORMALIZED;

    pub(crate) fn twister(core: Rc<RefCell<TwisterCore>>) -> Self {
        Self {
            target: Target::Twister(core),
        }
    }

    pub(crate) fn external(source: SourceCell) -> Self {
        Self {
            target: Target::External(source),
        }
    }

    /// Next double in [0, 1)
    pub fn draw(&mut self) -> f64 {
        match &self.target {
            Target::Twister(core) => core.borrow().draw_normalized(),
            Target::External(source) => external::draw_normalized(source),
        }
    }

    fn core(&self) -> Option<&Rc<RefCell<TwisterCore>>> {
        match &self.target {
            Target::Twister(core) => Some(core),
            Target::External(_) => None,
        }
    }

    pub fn seed(&self) -> Option<Seed> {
        self.core().map(|core| core.borrow().seed())
    }

    pub fn seed_length(&self) -> Option<usize> {
        self.seed().map(|seed| seed.len())
    }

    pub fn state(&self) -> Option<Vec<u32>> {
        self.core().map(|core| core.borrow().state())
    }

    pub fn state_ref(&self) -> Option<SharedState> {
        self.core().and_then(|core| core.borrow().state_ref())
    }

    /// Install a new state in the parent; no-op for external sources
    pub fn set_state(&mut self, words: &[u32]) -> Result<(), PrngError> {
        match self.core() {
            Some(core) => core.borrow_mut().set_state(words),
            None => Ok(()),
        }
    }

    pub fn state_length(&self) -> Option<usize> {
        self.core().map(|core| core.borrow().buffer.len())
    }

    pub fn byte_length(&self) -> Option<usize> {
        self.state_length()
            .map(|len| len * std::mem::size_of::<u32>())
    }

    pub fn to_json(&self) -> Option<PrngJson> {
        self.core().map(|core| core.borrow().to_json())
    }
}

impl std::fmt::Debug for NormalizedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.target {
            Target::Twister(_) => "mt19937",
            Target::External(_) => "external",
        };
        f.debug_struct("NormalizedView").field("target", &kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::handle::Mt19937;
    use crate::rng::{Seed, TwistEngine};

    #[test]
    fn test_view_advances_parent_by_two_draws() {
        let mut parent = Mt19937::with_seed(Seed::from_scalar(77).unwrap());
        let mut reference = TwistEngine::new(Seed::from_scalar(77).unwrap());

        let mut view = parent.normalized();
        assert_eq!(view.draw(), reference.draw_normalized());
        assert_eq!(parent.draw(), reference.draw());
    }

    #[test]
    fn test_view_follows_parent_state_replacement() {
        let mut parent = Mt19937::with_seed(Seed::from_scalar(77).unwrap());
        let view = parent.normalized();
        let longer = Mt19937::with_seed(Seed::from_words(&[1, 2]).unwrap()).state();
        parent.set_state(&longer).unwrap();
        assert_eq!(view.state(), Some(longer));
        assert_eq!(view.seed_length(), Some(2));
    }

    #[test]
    fn test_set_state_through_view_reaches_parent() {
        let parent = Mt19937::with_seed(Seed::from_scalar(3).unwrap());
        let saved = parent.state();
        let mut view = parent.normalized();
        view.draw();
        view.set_state(&saved).unwrap();
        assert_eq!(parent.state(), saved);
    }

    #[test]
    fn test_view_range() {
        let parent = Mt19937::with_seed(Seed::from_scalar(11).unwrap());
        let mut view = parent.normalized();
        for _ in 0..10_000 {
            let v = view.draw();
            assert!((0.0..1.0).contains(&v), "normalized draw {} out of range", v);
        }
    }
}
