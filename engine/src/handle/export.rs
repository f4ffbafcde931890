//! JSON export and revival
//!
//! A generator serializes to
//! `{"type": "PRNG", "name": ..., "state": [...], "params": [...]}` with the
//! encoded state as a plain array of u32 words, so it travels between
//! processes unchanged.

use serde::{Deserialize, Serialize};

use super::config::StateInput;
use super::mt19937::{self, Mt19937};
use super::PrngError;

/// Value of the `type` field.
pub const JSON_TYPE: &str = "PRNG";

/// Portable JSON form of a generator or sampler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrngJson {
    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,

    pub state: Vec<u32>,

    #[serde(default)]
    pub params: Vec<f64>,
}

impl PrngJson {
    pub fn new(name: &str, state: Vec<u32>, params: Vec<f64>) -> Self {
        Self {
            kind: JSON_TYPE.to_string(),
            name: name.to_string(),
            state,
            params,
        }
    }

    pub fn to_json_string(&self) -> Result<String, PrngError> {
        serde_json::to_string(self)
            .map_err(|e| PrngError::InvalidConfiguration(format!("JSON export failed: {}", e)))
    }

    pub fn from_json_str(json: &str) -> Result<Self, PrngError> {
        serde_json::from_str(json)
            .map_err(|e| PrngError::InvalidConfiguration(format!("JSON parse failed: {}", e)))
    }

    /// Check the `type` and `name` fields.
    pub(crate) fn ensure_name(&self, name: &str) -> Result<(), PrngError> {
        if self.kind != JSON_TYPE {
            return Err(PrngError::InvalidConfiguration(format!(
                "Expected type '{}', got '{}'",
                JSON_TYPE, self.kind
            )));
        }
        if self.name != name {
            return Err(PrngError::InvalidConfiguration(format!(
                "Expected generator '{}', got '{}'",
                name, self.name
            )));
        }
        Ok(())
    }

    /// Rebuild an MT19937 handle that continues the exported sequence
    ///
    /// # Example
    /// ```
    /// use mt_prng_core_rs::handle::{Mt19937, PrngJson};
    /// use mt_prng_core_rs::rng::Seed;
    ///
    /// let mut rng = Mt19937::with_seed(Seed::from_scalar(42).unwrap());
    /// rng.draw();
    /// let json = rng.to_json().to_json_string().unwrap();
    ///
    /// let mut revived = PrngJson::from_json_str(&json).unwrap().revive().unwrap();
    /// assert_eq!(revived.draw(), rng.draw());
    /// ```
    pub fn revive(&self) -> Result<Mt19937, PrngError> {
        self.ensure_name(mt19937::NAME)?;
        Mt19937::from_state(StateInput::Words(self.state.clone()), true)
    }
}

/// Parse a JSON export and rebuild the MT19937 handle.
pub fn revive(json: &str) -> Result<Mt19937, PrngError> {
    PrngJson::from_json_str(json)?.revive()
}
