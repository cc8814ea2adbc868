//! JSON registry configuration.
//!
//! Cascades can be shipped as data instead of code:
//!
//! ```json
//! {
//!   "conferences": [
//!     {
//!       "code": "TST",
//!       "name": "Test Conference",
//!       "restart_on_reduction": true,
//!       "steps": [
//!         { "two_team": "head_to_head_two", "multi_team": "head_to_head_multi" },
//!         { "two_team": null, "multi_team": "head_to_head_loser_multi" },
//!         { "two_team": { "unimplemented": "coin toss" }, "multi_team": { "unimplemented": "coin toss" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A missing or `null` entry means the step does not exist for that group
//! size. Rule names are checked when the registry is built, never during
//! resolution.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigurationError, TiebreakError, TiebreakResult};
use crate::tiebreak::{Cascade, CascadeRegistry, CascadeStep, Rule, Step, DEFAULT_SOS_PRECISION};

/// Top-level registry file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// One entry per conference.
    pub conferences: Vec<CascadeConfig>,
}

/// One conference's cascade as written in the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Conference short code, matched case-insensitively.
    pub code: String,

    /// Display name; defaults to the code.
    #[serde(default)]
    pub name: String,

    /// Restart at step 0 whenever a rule leaves a smaller tie.
    #[serde(default)]
    pub restart_on_reduction: bool,

    /// Strength-of-schedule comparison precision in decimal places.
    #[serde(default = "default_sos_precision")]
    pub sos_precision: u32,

    /// Steps in cascade order.
    pub steps: Vec<StepConfig>,
}

/// A cascade step with optional per-size entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Entry for two-team ties.
    #[serde(default)]
    pub two_team: Option<StepSpec>,

    /// Entry for ties of three or more.
    #[serde(default)]
    pub multi_team: Option<StepSpec>,
}

/// A single step entry: a rule name or an unimplemented procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepSpec {
    /// Rule name, snake_case or PascalCase.
    Rule(String),

    /// A procedure the engine cannot evaluate.
    Unimplemented {
        /// The procedure as worded in the policy.
        unimplemented: String,
    },
}

const fn default_sos_precision() -> u32 {
    DEFAULT_SOS_PRECISION
}

impl StepSpec {
    fn to_step(&self) -> Result<Step, ConfigurationError> {
        match self {
            Self::Rule(name) => Ok(Step::Apply(name.parse::<Rule>()?)),
            Self::Unimplemented { unimplemented } => Ok(Step::unimplemented(unimplemented.clone())),
        }
    }
}

fn resolve_entry(entry: Option<&StepSpec>) -> Result<Step, ConfigurationError> {
    entry.map_or(Ok(Step::NotApplicable), StepSpec::to_step)
}

impl CascadeConfig {
    /// Builds a validated cascade.
    ///
    /// # Errors
    ///
    /// Returns the first `UnknownRule`, `ArityMismatch`, `EmptyCascade` or
    /// `InvalidConfig` defect found.
    pub fn to_cascade(&self) -> Result<Cascade, ConfigurationError> {
        let steps = self
            .steps
            .iter()
            .map(|s| -> Result<CascadeStep, ConfigurationError> {
                Ok(CascadeStep::new(
                    resolve_entry(s.two_team.as_ref())?,
                    resolve_entry(s.multi_team.as_ref())?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let name = if self.name.trim().is_empty() {
            self.code.trim().to_string()
        } else {
            self.name.clone()
        };
        Cascade::new(self.code.as_str(), name, steps)?
            .with_restart_on_reduction(self.restart_on_reduction)
            .with_sos_precision(self.sos_precision)
    }
}

impl RegistryConfig {
    /// Parses a registry file's contents.
    ///
    /// # Errors
    ///
    /// Returns `TiebreakError::Parse` for malformed JSON.
    pub fn from_json_str(json: &str) -> TiebreakResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a registry file.
    ///
    /// # Errors
    ///
    /// Returns `TiebreakError::Io` if the file cannot be read and
    /// `TiebreakError::Parse` for malformed JSON.
    pub fn from_path(path: impl AsRef<Path>) -> TiebreakResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TiebreakError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "read registry file");
        Self::from_json_str(&contents)
    }

    /// Validates every cascade and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns the first configuration defect, including duplicate codes.
    pub fn into_registry(self) -> Result<CascadeRegistry, ConfigurationError> {
        let mut registry = CascadeRegistry::new();
        for conference in &self.conferences {
            registry.register(conference.to_cascade()?)?;
        }
        debug!(conferences = registry.len(), "built cascade registry");
        Ok(registry)
    }
}

impl CascadeRegistry {
    /// Parses and validates a JSON registry.
    ///
    /// # Errors
    ///
    /// Returns a parse or configuration error.
    pub fn from_json_str(json: &str) -> TiebreakResult<Self> {
        Ok(RegistryConfig::from_json_str(json)?.into_registry()?)
    }

    /// Reads, parses and validates a JSON registry file.
    ///
    /// # Errors
    ///
    /// Returns an I/O, parse or configuration error.
    pub fn from_path(path: impl AsRef<Path>) -> TiebreakResult<Self> {
        Ok(RegistryConfig::from_path(path)?.into_registry()?)
    }
}
