//! MT PRNG Core - Rust Engine
//!
//! Seedable Mersenne Twister (MT19937) generator whose complete state is a
//! portable array of u32 words, plus the handle surface that distribution
//! samplers program against.
//!
//! # Architecture
//!
//! - **rng**: MT19937 engine, seed validation, encoded state format
//! - **handle**: Generator handles (MT19937 or external), normalized view,
//!   configuration, JSON export/revival
//! - **samplers**: Reference distributions built on the handle surface
//! - **ffi**: Python bindings (`pyo3` feature)
//!
//! # Critical Invariants
//!
//! 1. Same seed or state → same sequence, across processes and platforms
//! 2. State buffers are validated before any mutation
//! 3. Handles are single-threaded; state aliasing is explicit
//!
//! # Example
//!
//! ```
//! use mt_prng_core_rs::{GeneratorHandle, PrngOptions, Seed};
//!
//! let seed = Seed::from_scalar(5489).unwrap();
//! let mut rng = GeneratorHandle::new(PrngOptions::seeded(seed)).unwrap();
//! assert_eq!(rng.draw(), 3_499_211_612);
//! ```

// Module declarations
pub mod handle;
pub mod rng;
pub mod samplers;

// Re-exports for convenience
pub use handle::{
    revive, ExternalPrng, GeneratorHandle, Mt19937, NormalizedView, Prng, PrngConfig, PrngError,
    PrngJson, PrngOptions, SharedState, Source, StateInput,
};
pub use rng::{Seed, SeedError, StateError, TwistEngine};
pub use samplers::{Distribution, Exponential, Poisson, Sampler, Triangular, Uniform};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn mt_prng_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::prng::PyMt19937>()?;
    Ok(())
}
