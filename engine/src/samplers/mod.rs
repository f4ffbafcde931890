//! Distribution samplers
//!
//! A [`Sampler`] closes over one [`GeneratorHandle`] and applies a
//! [`Distribution`] transform to its normalized draws. It passes the handle's
//! seed/state surface through verbatim and adds the distribution name and
//! bound parameters to the JSON export.
//!
//! # Key Principles
//!
//! 1. **Determinism**: same seed + same parameters → same variates
//! 2. **No failures at draw time**: invalid parameters yield NaN
//! 3. **Bound or unbound**: parameters fixed at construction, or per call
//!
//! # Example
//!
//! ```
//! use mt_prng_core_rs::handle::PrngOptions;
//! use mt_prng_core_rs::rng::Seed;
//! use mt_prng_core_rs::samplers::{Exponential, Sampler};
//!
//! let options = PrngOptions::seeded(Seed::from_scalar(1234).unwrap());
//! let mut exponential = Sampler::new(Exponential::new(2.0), options).unwrap();
//!
//! let x = exponential.sample();
//! assert!(x >= 0.0);
//! assert_eq!(exponential.to_json().unwrap().params, vec![2.0]);
//! ```

mod transforms;

pub use transforms::{Exponential, Poisson, Triangular, Uniform};

use crate::handle::{GeneratorHandle, PrngError, PrngJson, PrngOptions, SharedState};
use crate::rng::Seed;

/// A distribution transform over normalized draws
pub trait Distribution: Sized + Clone {
    /// Identifier reported in JSON exports
    const NAME: &'static str;

    /// Whether the parameters describe a valid distribution
    fn is_valid(&self) -> bool;

    /// Parameters in their canonical order
    fn params(&self) -> Vec<f64>;

    /// Rebuild from exported parameters; `None` on a wrong count
    fn from_params(params: &[f64]) -> Option<Self>;

    /// Draw one variate; only called with valid parameters
    fn transform(&self, handle: &mut GeneratorHandle) -> f64;
}

/// Sampler bound to one generator handle
#[derive(Debug)]
pub struct Sampler<D: Distribution> {
    handle: GeneratorHandle,
    params: Option<D>,
}

impl<D: Distribution> Sampler<D> {
    pub const NAME: &'static str = D::NAME;

    /// Sampler with bound parameters
    pub fn new(distribution: D, options: PrngOptions) -> Result<Self, PrngError> {
        Ok(Self {
            handle: GeneratorHandle::new(options)?,
            params: Some(distribution),
        })
    }

    /// Sampler whose parameters are supplied on each call
    pub fn unbound(options: PrngOptions) -> Result<Self, PrngError> {
        Ok(Self {
            handle: GeneratorHandle::new(options)?,
            params: None,
        })
    }

    /// Wrap an existing handle
    pub fn with_handle(handle: GeneratorHandle, params: Option<D>) -> Self {
        Self { handle, params }
    }

    /// Rebuild from a JSON export, continuing its sequence
    pub fn from_json(json: &PrngJson) -> Result<Self, PrngError> {
        json.ensure_name(D::NAME)?;
        let params = if json.params.is_empty() {
            None
        } else {
            Some(D::from_params(&json.params).ok_or_else(|| {
                PrngError::InvalidConfiguration(format!(
                    "Invalid parameter list for {}: {:?}",
                    D::NAME,
                    json.params
                ))
            })?)
        };
        let handle = GeneratorHandle::new(PrngOptions::from_state(json.state.clone()))?;
        Ok(Self { handle, params })
    }

    /// Draw with the bound parameters; NaN when unbound or invalid
    pub fn sample(&mut self) -> f64 {
        match self.params.clone() {
            Some(distribution) => self.sample_with(&distribution),
            None => f64::NAN,
        }
    }

    /// Draw with explicit parameters; NaN when invalid
    pub fn sample_with(&mut self, distribution: &D) -> f64 {
        if !distribution.is_valid() {
            return f64::NAN;
        }
        distribution.transform(&mut self.handle)
    }

    pub fn params(&self) -> Option<&D> {
        self.params.as_ref()
    }

    pub fn handle(&self) -> &GeneratorHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut GeneratorHandle {
        &mut self.handle
    }

    pub fn seed(&self) -> Option<Seed> {
        self.handle.seed()
    }

    pub fn seed_length(&self) -> Option<usize> {
        self.handle.seed_length()
    }

    pub fn state(&self) -> Option<Vec<u32>> {
        self.handle.state()
    }

    pub fn state_ref(&self) -> Option<SharedState> {
        self.handle.state_ref()
    }

    pub fn set_state(&mut self, words: &[u32]) -> Result<(), PrngError> {
        self.handle.set_state(words)
    }

    pub fn state_length(&self) -> Option<usize> {
        self.handle.state_length()
    }

    pub fn byte_length(&self) -> Option<usize> {
        self.handle.byte_length()
    }

    /// Export with this distribution's name and bound parameters
    pub fn to_json(&self) -> Option<PrngJson> {
        let state = self.handle.state()?;
        let params = self.params.as_ref().map(D::params).unwrap_or_default();
        Some(PrngJson::new(D::NAME, state, params))
    }
}
