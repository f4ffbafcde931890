//! Tests for state sharing between handles
//!
//! With `copy = false`, handles built over one [`SharedState`] draw from a
//! single sequence. Assigning a state of a different length severs the link.

use mt_prng_core_rs::handle::StateInput;
use mt_prng_core_rs::rng::Seed;
use mt_prng_core_rs::{GeneratorHandle, Mt19937, PrngOptions, SharedState, TwistEngine};
use tracing_subscriber::EnvFilter;

/// Route handle debug events to the test writer; `RUST_LOG=debug` shows them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn aliased(buffer: &SharedState) -> Mt19937 {
    Mt19937::from_state(StateInput::Shared(buffer.clone()), false).unwrap()
}

fn shared(seed: &[u64]) -> SharedState {
    SharedState::new(Mt19937::with_seed(Seed::from_words(seed).unwrap()).state()).unwrap()
}

#[test]
fn test_aliased_handles_interleave_one_sequence() {
    init_tracing();
    let buffer = shared(&[1234]);
    let mut a = aliased(&buffer);
    let mut b = aliased(&buffer);
    assert!(a.aliases(&b));

    let mut reference = TwistEngine::new(Seed::from_scalar(1234).unwrap());
    for i in 0..1300 {
        let value = if i % 3 == 0 { a.draw() } else { b.draw() };
        assert_eq!(value, reference.draw(), "draw {} diverged", i);
    }
    assert_eq!(a.state(), b.state());
    assert_eq!(buffer.snapshot(), a.state());
}

#[test]
fn test_state_ref_hands_out_live_buffer() {
    let mut first = GeneratorHandle::new(
        PrngOptions::seeded(Seed::from_scalar(99).unwrap()).with_copy(false),
    )
    .unwrap();
    let live = first.state_ref().expect("copy = false exposes the buffer");
    let mut second = GeneratorHandle::new(PrngOptions::shared(live).with_copy(false)).unwrap();

    first.draw();
    assert_eq!(first.state(), second.state());
    let next = second.draw();
    let mut reference = TwistEngine::new(Seed::from_scalar(99).unwrap());
    reference.draw();
    assert_eq!(next, reference.draw());
}

#[test]
fn test_copy_policy_detaches_shared_input() {
    let buffer = shared(&[5]);
    let mut private = Mt19937::from_state(StateInput::Shared(buffer.clone()), true).unwrap();
    let before = buffer.snapshot();
    private.draw();
    assert_eq!(buffer.snapshot(), before);
    assert!(private.state_ref().is_none());
}

#[test]
fn test_same_length_assignment_keeps_aliasing() {
    init_tracing();
    let buffer = shared(&[1]);
    let mut a = aliased(&buffer);
    let b = aliased(&buffer);

    let replacement = Mt19937::with_seed(Seed::from_scalar(777).unwrap()).state();
    a.set_state(&replacement).unwrap();

    assert!(a.aliases(&b));
    assert_eq!(b.state(), replacement);
    assert_eq!(b.seed().words(), &[777]);
}

#[test]
fn test_length_change_severs_aliasing() {
    init_tracing();
    let buffer = shared(&[1]);
    let mut a = aliased(&buffer);
    let mut b = aliased(&buffer);

    let longer = Mt19937::with_seed(Seed::from_words(&[1, 2, 3]).unwrap()).state();
    a.set_state(&longer).unwrap();

    assert!(!a.aliases(&b));
    assert_eq!(a.seed_length(), 3);
    assert_eq!(b.seed_length(), 1);

    let before_b = b.state();
    a.draw();
    assert_eq!(b.state(), before_b, "severed handle must not advance");
    b.draw();
    assert_eq!(buffer.snapshot(), b.state());
}

#[test]
fn test_normalized_view_shares_parent_state() {
    let mut parent = Mt19937::with_seed(Seed::from_scalar(2024).unwrap());
    let mut view = parent.normalized();
    let mut reference = TwistEngine::new(Seed::from_scalar(2024).unwrap());

    assert_eq!(view.draw(), reference.draw_normalized());
    assert_eq!(parent.draw(), reference.draw());
    assert_eq!(view.draw(), reference.draw_normalized());
    assert_eq!(view.state(), Some(parent.state()));
}

#[test]
fn test_view_draws_advance_aliased_handles() {
    init_tracing();
    let buffer = shared(&[1234]);
    let a = aliased(&buffer);
    let mut b = aliased(&buffer);
    let mut view = a.normalized();
    let mut reference = TwistEngine::new(Seed::from_scalar(1234).unwrap());

    assert_eq!(view.draw(), reference.draw_normalized());
    assert_eq!(b.draw(), reference.draw());
    assert_eq!(view.draw(), reference.draw_normalized());
    assert_eq!(b.draw(), reference.draw());
    assert_eq!(view.state(), Some(b.state()));
}

#[test]
fn test_holders_counts_aliasing_handles() {
    let buffer = shared(&[8]);
    assert_eq!(buffer.holders(), 1);
    let a = aliased(&buffer);
    assert_eq!(buffer.holders(), 2);
    drop(a);
    assert_eq!(buffer.holders(), 1);
}
