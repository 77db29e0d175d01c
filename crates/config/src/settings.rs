// Pipeline settings
// Loaded from <config_dir>/qmeta/qmeta.toml or an explicit --config path

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tables::{InstituteRule, Tables};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Root of the staged data tree (`<data_dir>/raw/<year>/...`).
    pub data_dir: PathBuf,

    /// Where processed files go. None = `<data_dir>/processed`.
    pub output_dir: Option<PathBuf>,

    /// Extra `Institute,Country` CSV files, highest precedence first.
    pub mapping_files: Vec<PathBuf>,

    pub participants_file: Option<PathBuf>,

    /// Editions to process. Empty = every year directory found.
    pub years: Vec<String>,

    pub reconcile: ReconcileSettings,

    pub tables: TableOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: None,
            mapping_files: Vec::new(),
            participants_file: None,
            years: Vec::new(),
            reconcile: ReconcileSettings::default(),
            tables: TableOverrides::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileSettings {
    /// Unresolved speaker names must be longer than this to be fuzzy matched.
    pub min_fuzzy_name_len: usize,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self { min_fuzzy_name_len: 5 }
    }
}

/// Inline table rules, applied in front of the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOverrides {
    pub institutes: Vec<InstituteRule>,
    pub fixups: Vec<InstituteRule>,
    pub country_codes: BTreeMap<String, String>,
}

impl TableOverrides {
    pub fn is_empty(&self) -> bool {
        self.institutes.is_empty() && self.fixups.is_empty() && self.country_codes.is_empty()
    }

    /// Apply to `tables`. Country codes go first so rules may name countries
    /// they introduce.
    pub fn apply(&self, tables: Tables) -> Result<Tables, ConfigError> {
        tables
            .with_country_codes(self.country_codes.clone())?
            .with_institutes(self.institutes.clone())?
            .with_fixups(self.fixups.clone())
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl Settings {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("data_dir must not be empty".into()));
        }

        for year in &self.years {
            if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::Validation(format!(
                    "year '{year}' must be a string of digits"
                )));
            }
        }

        if self.reconcile.min_fuzzy_name_len == 0 {
            return Err(ConfigError::Validation(
                "reconcile.min_fuzzy_name_len must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Default settings file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qmeta")
            .join("qmeta.toml")
    }

    /// Load settings. An explicit path must exist; the default path is
    /// optional and falls back to defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::config_path();
                if !p.exists() {
                    log::debug!("no settings file at {}, using defaults", p.display());
                    return Ok(Self::default());
                }
                p
            }
        };

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::info!("loaded settings from {}", path.display());
        Self::from_toml(&contents)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| self.data_dir.join("processed"))
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
