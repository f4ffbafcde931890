//! Opaque external sources
//!
//! Wraps any caller-supplied [`RngCore`]. Its state cannot be introspected or
//! round-tripped, so this handle exposes draws only.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rand_core::RngCore;

use super::export::PrngJson;
use super::normalized::NormalizedView;
use super::Prng;
use crate::rng::normalize;

/// Identifier reported for external sources.
pub const NAME: &str = "external";

pub(crate) type SourceCell = Rc<RefCell<Box<dyn RngCore>>>;

/// Handle over a caller-supplied source
pub struct ExternalPrng {
    source: SourceCell,
}

impl ExternalPrng {
    pub fn new(source: Box<dyn RngCore>) -> Self {
        tracing::debug!("external prng handle created");
        Self {
            source: Rc::new(RefCell::new(source)),
        }
    }

    pub fn draw(&mut self) -> u32 {
        self.source.borrow_mut().next_u32()
    }

    pub fn draw_normalized(&mut self) -> f64 {
        draw_normalized(&self.source)
    }

    /// View producing doubles in [0, 1) over the same source
    pub fn normalized(&self) -> NormalizedView {
        NormalizedView::external(Rc::clone(&self.source))
    }
}

pub(crate) fn draw_normalized(source: &SourceCell) -> f64 {
    let mut source = source.borrow_mut();
    let high = source.next_u32();
    let low = source.next_u32();
    normalize(high, low)
}

impl Prng for ExternalPrng {
    fn name(&self) -> &'static str {
        NAME
    }

    fn draw(&mut self) -> u32 {
        ExternalPrng::draw(self)
    }

    fn draw_normalized(&mut self) -> f64 {
        ExternalPrng::draw_normalized(self)
    }

    fn to_json(&self) -> Option<PrngJson> {
        None
    }
}

impl fmt::Debug for ExternalPrng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalPrng").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_draws_come_from_source() {
        let mut prng = ExternalPrng::new(Box::new(StepRng::new(7, 1)));
        assert_eq!(prng.draw(), 7);
        assert_eq!(prng.draw(), 8);
    }

    #[test]
    fn test_no_json() {
        let prng = ExternalPrng::new(Box::new(StepRng::new(0, 1)));
        assert!(Prng::to_json(&prng).is_none());
    }

    #[test]
    fn test_normalized_view_shares_source() {
        let mut prng = ExternalPrng::new(Box::new(StepRng::new(0, 1)));
        let mut view = prng.normalized();
        view.draw();
        assert_eq!(prng.draw(), 2);
    }
}
