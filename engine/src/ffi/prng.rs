//! PyO3 wrapper for the MT19937 handle
//!
//! This module provides the Python interface to [`GeneratorHandle`].

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_prng_config, prng_error_to_py, prng_json_to_py, py_to_prng_json};
use crate::handle::{GeneratorHandle, PrngOptions};

/// Python wrapper for the MT19937 generator
///
/// Handles are not thread-safe, so the class is marked `unsendable` and
/// raises if touched from a thread other than its creator.
///
/// # Example (from Python)
///
/// ```python
/// from mt_prng._core import Mt19937
///
/// rng = Mt19937({"seed": 1234})
/// assert rng.draw() == 822569775
///
/// saved = rng.to_json()
/// clone = Mt19937.from_json(saved)
/// assert clone.draw() == rng.draw()
/// ```
#[pyclass(name = "Mt19937", unsendable)]
pub struct PyMt19937 {
    inner: GeneratorHandle,
}

#[pymethods]
impl PyMt19937 {
    /// Create a generator from an optional configuration dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if:
    /// - The seed is not a positive 32-bit integer or valid sequence
    /// - The state buffer fails validation
    /// - Both seed and state are given
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let options = match config {
            Some(dict) => parse_prng_config(dict)?,
            None => PrngOptions::default(),
        };
        let inner = GeneratorHandle::new(options).map_err(prng_error_to_py)?;
        Ok(PyMt19937 { inner })
    }

    /// Rebuild a generator from an exported dict
    #[staticmethod]
    fn from_json(json: &Bound<'_, PyDict>) -> PyResult<Self> {
        let json = py_to_prng_json(json)?;
        let inner = GeneratorHandle::from_json(&json).map_err(prng_error_to_py)?;
        Ok(PyMt19937 { inner })
    }

    /// Next unsigned 32-bit integer
    fn draw(&mut self) -> u32 {
        self.inner.draw()
    }

    /// Next double in [0, 1)
    fn normalized(&mut self) -> f64 {
        self.inner.draw_normalized()
    }

    #[getter]
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[getter]
    fn seed(&self) -> Option<Vec<u32>> {
        self.inner.seed().map(Vec::from)
    }

    #[getter]
    fn seed_length(&self) -> Option<usize> {
        self.inner.seed_length()
    }

    #[getter]
    fn state(&self) -> Option<Vec<u32>> {
        self.inner.state()
    }

    #[setter]
    fn set_state(&mut self, words: Vec<u32>) -> PyResult<()> {
        self.inner.set_state(&words).map_err(prng_error_to_py)
    }

    #[getter]
    fn state_length(&self) -> Option<usize> {
        self.inner.state_length()
    }

    #[getter]
    fn byte_length(&self) -> Option<usize> {
        self.inner.byte_length()
    }

    /// Export as `{"type", "name", "state", "params"}`
    fn to_json(&self, py: Python) -> PyResult<Option<Py<PyDict>>> {
        self.inner
            .to_json()
            .map(|json| prng_json_to_py(py, &json))
            .transpose()
    }

    fn __repr__(&self) -> String {
        match self.inner.seed() {
            Some(seed) => format!("Mt19937(seed={:?})", seed.words()),
            None => "Mt19937(<external>)".to_string(),
        }
    }
}
