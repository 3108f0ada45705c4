use crate::consts::DEFAULT_FALSE_POSITIVE_RATE;
use crate::errors::{Result, SpellError};
use crate::persist::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Build settings, loadable from a JSON file. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub false_positive_rate: f64,
    /// When absent, the number of dictionary words read is used.
    pub expected_elements: Option<u64>,
    /// Lower-case words before inserting them and before querying.
    pub lowercase: bool,
    pub encoding: Encoding,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            expected_elements: None,
            lowercase: true,
            encoding: Encoding::Unpacked,
        }
    }
}

impl BuildConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: BuildConfig = serde_json::from_str(&s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.false_positive_rate;
        if !(p > 0.0 && p < 1.0) {
            return Err(SpellError::invalid(format!("false_positive_rate {p} is outside (0, 1)")));
        }
        if self.expected_elements == Some(0) {
            return Err(SpellError::invalid("expected_elements must be at least 1"));
        }
        Ok(())
    }
}
