//! Type conversion utilities for FFI boundary
//!
//! Converts between Python dicts/lists and the crate's configuration and
//! export types.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList};
use serde_json::Value;

use crate::handle::{PrngConfig, PrngError, PrngJson, PrngOptions};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract an optional field from a Python dict.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if value.is_none() => Ok(None),
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

/// Map crate errors onto `ValueError`.
pub fn prng_error_to_py(err: PrngError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert a Python seed (int or list of ints) into a JSON value.
///
/// Integer validation happens in `Seed::from_json`; only the Python-level
/// shape is checked here.
fn seed_to_json(seed: &Bound<'_, PyAny>) -> PyResult<Value> {
    if seed.is_instance_of::<PyBool>() {
        return Err(PyErr::new::<PyValueError, _>(
            "Invalid seed: Seed must be an integer, got a bool",
        ));
    }
    if let Ok(list) = seed.downcast::<PyList>() {
        let words = list
            .iter()
            .map(|item| seed_to_json(&item))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(Value::Array(words));
    }
    if let Ok(value) = seed.extract::<u64>() {
        return Ok(Value::from(value));
    }
    if let Ok(value) = seed.extract::<i64>() {
        return Ok(Value::from(value));
    }
    if let Ok(value) = seed.downcast::<PyFloat>() {
        return Ok(Value::from(value.value()));
    }
    if seed.is_instance_of::<PyInt>() {
        return Err(PyErr::new::<PyValueError, _>(format!(
            "Invalid seed: Seed {} exceeds the maximum of {}",
            seed.repr()?,
            crate::rng::MAX_SEED
        )));
    }
    Err(PyErr::new::<PyValueError, _>(format!(
        "Invalid seed: Seed must be an integer, got {}",
        seed.repr()?
    )))
}

/// Convert a Python dict into generator options
///
/// Recognized keys: `seed`, `state`, `copy`. Unknown keys are rejected.
///
/// # Errors
///
/// Returns PyErr if:
/// - An unknown key is present
/// - Both `seed` and `state` are present
/// - The seed or state fails validation
pub fn parse_prng_config(py_config: &Bound<'_, PyDict>) -> PyResult<PrngOptions> {
    for key in py_config.keys() {
        let key: String = key.extract()?;
        if !matches!(key.as_str(), "seed" | "state" | "copy") {
            return Err(PyErr::new::<PyValueError, _>(format!(
                "Invalid configuration: unknown field '{}'",
                key
            )));
        }
    }

    let seed = match py_config.get_item("seed")? {
        Some(value) if !value.is_none() => Some(seed_to_json(&value)?),
        _ => None,
    };
    let config = PrngConfig {
        seed,
        state: extract_optional(py_config, "state")?,
        copy: extract_optional(py_config, "copy")?,
    };

    PrngOptions::try_from(config).map_err(prng_error_to_py)
}

/// Convert a JSON export to a Python dict
pub fn prng_json_to_py(py: Python<'_>, json: &PrngJson) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("type", &json.kind)?;
    dict.set_item("name", &json.name)?;
    dict.set_item("state", PyList::new_bound(py, &json.state))?;
    dict.set_item("params", PyList::new_bound(py, &json.params))?;
    Ok(dict.unbind())
}

/// Convert a Python dict back to a JSON export
pub fn py_to_prng_json(dict: &Bound<'_, PyDict>) -> PyResult<PrngJson> {
    let field = |key: &str| {
        dict.get_item(key)?.ok_or_else(|| {
            PyErr::new::<PyValueError, _>(format!("Missing required field '{}'", key))
        })
    };
    Ok(PrngJson {
        kind: field("type")?.extract()?,
        name: field("name")?.extract()?,
        state: field("state")?.extract()?,
        params: extract_optional(dict, "params")?.unwrap_or_default(),
    })
}
