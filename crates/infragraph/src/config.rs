//! Classifier configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration:
//!
//! ```json
//! {
//!   "importance": {"root_multiplier": 2.0, "dead_cap": 15},
//!   "dangling": "materialize",
//!   "payload_variable": "elements"
//! }
//! ```

use crate::error::{GraphError, Result};
use crate::importance::ImportanceWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What inventory import does with an edge to a resource it never listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Fail with [`GraphError::DanglingReference`]
    #[default]
    Reject,
    /// Create a healthy node of the type named in the edge row
    Materialize,
}

/// Settings for a [`crate::Classifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Importance formula coefficients
    pub importance: ImportanceWeights,
    /// Handling of unknown endpoints in inventory tables
    pub dangling: DanglingPolicy,
    /// Global variable name used by [`crate::export::Payload::to_script`]
    pub payload_variable: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            importance: ImportanceWeights::default(),
            dangling: DanglingPolicy::default(),
            payload_variable: "elements".to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GraphError::serialization("Failed to parse classifier config", Some(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidConfig`] for the first bad setting.
    pub fn validate(&self) -> Result<()> {
        self.importance.validate()?;

        let variable = &self.payload_variable;
        let valid_identifier = variable
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && variable
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !valid_identifier {
            return Err(GraphError::InvalidConfig {
                message: format!("payload_variable {variable:?} is not a JavaScript identifier"),
            });
        }

        Ok(())
    }
}
