//! Engine configuration.
//!
//! ```toml
//! [equality]
//! tolerance = 0.001
//! max_depth = 10
//! canonicalize = false
//! ignore_case = false
//!
//! [logging]
//! profile = "production"
//! ```
//!
//! Every key is optional and falls back to its default. Unknown keys are
//! rejected at every level.

use crate::comparator::{Comparator, EqualityOptions};
use crate::errors::{AssertxError, Result};
use crate::logging_facility::Profile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub equality: EqualityOptions,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// `Config` when the document does not parse or holds invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source).map_err(|e| AssertxError::Config {
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// `Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AssertxError::Config {
            message: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// `Config` when the equality options are invalid.
    pub fn validate(&self) -> Result<()> {
        self.equality
            .validate()
            .map_err(|e| AssertxError::Config {
                message: format!("equality: {}", e),
            })
    }

    /// A comparator configured with the equality options.
    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.equality)
    }
}
