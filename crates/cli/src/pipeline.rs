// Settings, lookup tables and participants, assembled from the settings
// file and command-line flags (flags win)

use std::path::{Path, PathBuf};

use qmeta_config::{Settings, Tables};
use qmeta_recon::ParticipantDirectory;

use crate::{CliError, InputArgs};

/// Flags of `qmeta run` that override settings-file values.
#[derive(Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub inputs: InputArgs,
    pub years: Vec<String>,
}

impl Overrides {
    pub fn from_inputs(inputs: InputArgs) -> Self {
        Self { inputs, ..Self::default() }
    }

    fn apply(self, settings: &mut Settings) {
        if let Some(dir) = self.data_dir {
            settings.data_dir = dir;
        }
        if self.output_dir.is_some() {
            settings.output_dir = self.output_dir;
        }
        if !self.inputs.mappings.files.is_empty() {
            settings.mapping_files = self.inputs.mappings.files;
        }
        if self.inputs.participants.is_some() {
            settings.participants_file = self.inputs.participants;
        }
        if !self.years.is_empty() {
            settings.years = self.years;
        }
    }
}

pub fn load_settings(config: Option<&Path>, overrides: Overrides) -> Result<Settings, CliError> {
    let mut settings = Settings::load(config).map_err(CliError::config)?;
    overrides.apply(&mut settings);
    Ok(settings)
}

/// Built-in tables, then mapping files, then the settings file's inline
/// `[tables]`. Each layer goes in front of the previous one, so the first
/// mapping file outranks later ones and inline rules outrank all files.
pub fn load_tables(settings: &Settings) -> Result<Tables, CliError> {
    let mut tables = Tables::builtin();
    for path in settings.mapping_files.iter().rev() {
        if let Some(rules) = qmeta_io::mappings::load_rules(path).map_err(CliError::io)? {
            tables = tables.with_institutes(rules).map_err(|e| {
                CliError::config(e).with_hint(format!("conflict inside {}", path.display()))
            })?;
        }
    }
    let tables = settings.tables.apply(tables).map_err(CliError::config)?;
    tables.validate().map_err(CliError::config)?;
    log::debug!(
        "tables: {} codes, {} countries, {} institutes, {} fixups",
        tables.country_codes().len(),
        tables.countries().len(),
        tables.institutes().len(),
        tables.fixups().len()
    );
    Ok(tables)
}

pub fn load_participants(settings: &Settings) -> Result<Option<ParticipantDirectory>, CliError> {
    let Some(path) = &settings.participants_file else {
        return Ok(None);
    };
    let Some(participants) =
        qmeta_io::participants::load_participants(path).map_err(CliError::io)?
    else {
        return Ok(None);
    };
    let dir = ParticipantDirectory::new(participants, settings.reconcile.min_fuzzy_name_len);
    if dir.is_empty() {
        log::warn!("{}: no participant has an affiliation or a country", path.display());
        return Ok(None);
    }
    log::info!("participant directory: {} usable entries", dir.len());
    Ok(Some(dir))
}
