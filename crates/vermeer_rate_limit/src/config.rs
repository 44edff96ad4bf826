//! TOML-backed budget tables.
//!
//! Per-model budgets ship as compiled-in defaults and can be replaced by
//! a user file, either `~/.config/vermeer/vermeer.toml` or a
//! `vermeer.toml` in the working directory. Later sources win wholesale:
//! an override file supplies a whole budget table, it does not patch
//! individual rows of an earlier one.

use crate::BudgetPolicy;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use vermeer_error::{ConfigError, VermeerError, VermeerResult};

fn default_fallback_rpm() -> u32 {
    crate::DEFAULT_FALLBACK_RPM
}

/// One budget table row.
///
/// Budgets are an array of tables rather than a map so that file order is
/// preserved; substring resolution is first-match-wins in that order.
///
/// ```toml
/// [[budgets]]
/// model = "gpt-4"
/// rpm = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BudgetEntry {
    /// Model key: full identifier or a substring of the base model name
    pub model: String,
    /// Requests per minute granted to matching models
    pub rpm: u32,
}

/// Top-level Vermeer configuration.
///
/// # Example
///
/// ```no_run
/// use vermeer_rate_limit::VermeerConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Bundled defaults + user overrides
/// let config = VermeerConfig::load()?;
/// let policy = config.budget_policy();
/// println!("gpt-4 budget: {} rpm", policy.resolve("gpt-4"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VermeerConfig {
    /// Budget applied when no table entry matches
    #[serde(default = "default_fallback_rpm")]
    pub fallback_rpm: u32,

    /// Per-model budget entries, in resolution order
    #[serde(default)]
    pub budgets: Vec<BudgetEntry>,
}

impl Default for VermeerConfig {
    fn default() -> Self {
        Self {
            fallback_rpm: default_fallback_rpm(),
            budgets: Vec::new(),
        }
    }
}

impl VermeerConfig {
    /// Read a budget table from a single file, ignoring the usual sources.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or its TOML does not fit the budget
    /// schema.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VermeerResult<Self> {
        debug!("reading budget table");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                VermeerError::from(ConfigError::new(format!(
                    "cannot read budget file {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VermeerError::from(ConfigError::new(format!(
                    "budget file does not fit the expected schema: {}",
                    e
                )))
            })
    }

    /// Load the budget table, letting user files override the bundled one.
    ///
    /// Three sources are consulted, each replacing the previous: the
    /// defaults compiled into the library, then
    /// `~/.config/vermeer/vermeer.toml`, then `./vermeer.toml`. The user
    /// files are optional; a missing one is skipped without error.
    #[instrument]
    pub fn load() -> VermeerResult<Self> {
        debug!("loading budget table, working-directory file wins");

        const BUNDLED: &str = include_str!("../vermeer.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(BUNDLED, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vermeer/vermeer.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("vermeer").required(false));

        builder
            .build()
            .map_err(|e| {
                VermeerError::from(ConfigError::new(format!(
                    "cannot assemble budget sources: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VermeerError::from(ConfigError::new(format!(
                    "budget configuration does not fit the expected schema: {}",
                    e
                )))
            })
    }

    /// Build the pure resolution policy from this configuration.
    pub fn budget_policy(&self) -> BudgetPolicy {
        BudgetPolicy::new(
            self.budgets
                .iter()
                .map(|entry| (entry.model.clone(), entry.rpm)),
            self.fallback_rpm,
        )
    }
}
