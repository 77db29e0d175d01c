// Staged talk data: data/raw/<year>/talks.json or talks.csv

use std::path::{Path, PathBuf};

use serde_json::Value;

use qmeta_core::{TalkRecord, TalkType};
use qmeta_recon::{Edition, PipelineInput};

use crate::csv::{column, field, read_file_as_utf8, read_rows};
use crate::error::IoError;

pub const TALKS_JSON: &str = "talks.json";
pub const TALKS_CSV: &str = "talks.csv";

const TITLE: &[&str] = &["title"];
const SPEAKER: &[&str] = &["speaker"];
const INSTITUTE: &[&str] = &["institute", "affiliation"];
const COUNTRY: &[&str] = &["country"];
const SESSION: &[&str] = &["session"];
const TYPE: &[&str] = &["type"];

/// Year directories under `raw_dir`, ascending. Only all-digit names count.
pub fn discover_years(raw_dir: &Path) -> Result<Vec<String>, IoError> {
    let entries = std::fs::read_dir(raw_dir).map_err(|e| IoError::read(raw_dir, e))?;
    let mut years = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IoError::read(raw_dir, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            years.push(name);
        }
    }
    years.sort();
    Ok(years)
}

/// The staged file for one edition, JSON preferred over CSV.
pub fn edition_file(raw_dir: &Path, year: &str) -> Option<PathBuf> {
    let dir = raw_dir.join(year);
    [TALKS_JSON, TALKS_CSV].iter().map(|f| dir.join(f)).find(|p| p.is_file())
}

pub fn load_edition(raw_dir: &Path, year: &str) -> Result<Edition, IoError> {
    let Some(path) = edition_file(raw_dir, year) else {
        return Err(IoError::Read {
            path: raw_dir.join(year).display().to_string(),
            message: format!("no {TALKS_JSON} or {TALKS_CSV}"),
        });
    };
    let records = if path.extension().is_some_and(|e| e == "json") {
        let content = read_file_as_utf8(&path)?;
        parse_json(year, &content).map_err(|e| IoError::parse(&path, e))?
    } else {
        parse_csv(year, &read_rows(&path)?)
    };
    log::debug!("{}: {} talks", path.display(), records.len());
    Ok(Edition { year: year.to_string(), records })
}

/// Load every edition under `raw_dir`, or only `years` when given.
///
/// An edition that is missing or cannot be read is skipped with a warning.
/// Only an unreadable `raw_dir` is an error.
pub fn load_editions(raw_dir: &Path, years: &[String]) -> Result<PipelineInput, IoError> {
    let years = if years.is_empty() { discover_years(raw_dir)? } else { years.to_vec() };
    let mut editions = Vec::with_capacity(years.len());
    for year in &years {
        match load_edition(raw_dir, year) {
            Ok(edition) => editions.push(edition),
            Err(e) => log::warn!("skipping edition {year}: {e}"),
        }
    }
    log::info!("loaded {} of {} edition(s) from {}", editions.len(), years.len(), raw_dir.display());
    Ok(PipelineInput { editions })
}

/// Talks from a JSON array of objects. Keys are matched ignoring case;
/// non-string values are taken by their JSON text, `null` as empty.
pub fn parse_json(year: &str, content: &str) -> Result<Vec<TalkRecord>, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err("expected a JSON array of talks".to_string());
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Value::Object(obj) = item else {
            return Err(format!("talk {i} is not an object"));
        };
        let get = |names: &[&str]| -> String {
            obj.iter()
                .find(|(k, _)| names.iter().any(|n| k.eq_ignore_ascii_case(n)))
                .map(|(_, v)| match v {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .unwrap_or_default()
        };
        records.push(
            TalkRecord::new(year, TalkType::parse(&get(TYPE)), get(SPEAKER), &get(INSTITUTE), &get(COUNTRY))
                .with_title(get(TITLE))
                .with_session(get(SESSION)),
        );
    }
    Ok(records)
}

/// Talks from CSV rows whose first row is the header.
pub fn parse_csv(year: &str, rows: &[Vec<String>]) -> Vec<TalkRecord> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let title = column(header, TITLE);
    let speaker = column(header, SPEAKER);
    let institute = column(header, INSTITUTE);
    let country = column(header, COUNTRY);
    let session = column(header, SESSION);
    let talk_type = column(header, TYPE);

    body.iter()
        .map(|row| {
            TalkRecord::new(
                year,
                TalkType::parse(field(row, talk_type)),
                field(row, speaker),
                field(row, institute),
                field(row, country),
            )
            .with_title(field(row, title))
            .with_session(field(row, session))
        })
        .collect()
}
