// Processed output: per-type CSVs, statistics.json, summary.json

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use qmeta_core::{Confidence, TalkRecord, TalkType};
use qmeta_recon::model::EditionResult;
use qmeta_recon::stats::TalkStats;
use qmeta_recon::PipelineResult;

use crate::csv::write_rows;
use crate::error::IoError;

pub const TALK_COLUMNS: [&str; 8] =
    ["Year", "Type", "Title", "Speaker", "Institute", "Country", "Session", "Country_Confidence"];

pub const ALL_TALKS: &str = "all_talks.csv";
pub const STATISTICS: &str = "statistics.json";
pub const SUMMARY: &str = "summary.json";

#[derive(Serialize)]
struct EditionStatistics<'a> {
    year: &'a str,
    #[serde(flatten)]
    stats: &'a TalkStats,
}

/// Write every edition plus `summary.json` under `out_dir`. Returns the
/// paths written.
pub fn write_all(out_dir: &Path, result: &PipelineResult) -> Result<Vec<PathBuf>, IoError> {
    let mut written = Vec::new();
    for edition in &result.editions {
        written.extend(write_edition(out_dir, edition)?);
    }
    let summary = out_dir.join(SUMMARY);
    write_json(&summary, result)?;
    written.push(summary);
    log::info!("wrote {} file(s) to {}", written.len(), out_dir.display());
    Ok(written)
}

/// `<out_dir>/<year>/{plenary,parallel,poster,all}_talks.csv` and
/// `statistics.json`.
pub fn write_edition(out_dir: &Path, edition: &EditionResult) -> Result<Vec<PathBuf>, IoError> {
    let dir = out_dir.join(&edition.year);
    std::fs::create_dir_all(&dir).map_err(|e| IoError::write(&dir, e))?;

    let mut written = Vec::with_capacity(TalkType::ANALYZED.len() + 2);
    for talk_type in TalkType::ANALYZED {
        let path = dir.join(format!("{}.csv", talk_type.file_stem()));
        let rows = edition.records.iter().filter(|r| r.talk_type == talk_type).map(talk_row);
        write_rows(&path, &TALK_COLUMNS, rows)?;
        written.push(path);
    }

    let all = dir.join(ALL_TALKS);
    write_rows(&all, &TALK_COLUMNS, edition.records.iter().map(talk_row))?;
    written.push(all);

    let stats = dir.join(STATISTICS);
    write_json(&stats, &EditionStatistics { year: &edition.year, stats: &edition.stats })?;
    written.push(stats);

    Ok(written)
}

fn talk_row(r: &TalkRecord) -> [String; 8] {
    [
        r.year.clone(),
        r.talk_type.to_string(),
        r.title.clone(),
        r.speaker.clone(),
        r.institute.display().to_string(),
        r.country.display().to_string(),
        r.session.clone(),
        r.country.confidence().to_string(),
    ]
}

/// Institutes whose country is unknown or only a fallback guess, with their
/// talk counts, most frequent first.
pub fn unknown_institutes<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a TalkRecord>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        if r.country.confidence() > Confidence::Fallback {
            continue;
        }
        if let Some(institute) = r.institute.value() {
            *counts.entry(institute).or_insert(0) += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().map(|(k, n)| (k.to_string(), n)).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// An `Institute,Country` template with the country left blank, loadable
/// as a mapping file once filled in. Returns the number of institutes.
pub fn write_unknown_institutes(path: &Path, result: &PipelineResult) -> Result<usize, IoError> {
    let unknown = unknown_institutes(result.editions.iter().flat_map(|e| e.records.iter()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::write(parent, e))?;
    }
    write_rows(path, &["Institute", "Country"], unknown.iter().map(|(i, _)| [i.as_str(), ""]))?;
    log::info!("{}: {} institute(s) need a country", path.display(), unknown.len());
    Ok(unknown.len())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| IoError::write(path, e))?;
    writer.write_all(b"\n").map_err(|e| IoError::write(path, e))?;
    writer.flush().map_err(|e| IoError::write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmeta_config::Tables;
    use qmeta_recon::{run, Edition, PipelineInput, ReconcileOptions};
    use std::fs;
    use tempfile::tempdir;

    fn result() -> PipelineResult {
        let records = vec![
            TalkRecord::new("2019", TalkType::Plenary, "A. Lee", "Fermilab", "USA").with_title("Flow"),
            TalkRecord::new("2019", TalkType::Poster, "B. Wu", "Nowhere Institute", ""),
            TalkRecord::new("2019", TalkType::Poster, "C. Chen", "Nowhere Institute", ""),
            TalkRecord::new("2019", TalkType::Parallel, "D. Roe", "Lab of Things, Place", ""),
            TalkRecord::new("2019", TalkType::Flash, "E. Poe", "CERN", ""),
        ];
        let input = PipelineInput { editions: vec![Edition { year: "2019".into(), records }] };
        run(&Tables::builtin(), None, input, &ReconcileOptions::default())
    }

    #[test]
    fn writes_processed_tree() {
        let dir = tempdir().unwrap();
        let written = write_all(dir.path(), &result()).unwrap();
        assert_eq!(written.len(), 6);

        let year = dir.path().join("2019");
        for name in ["plenary_talks.csv", "parallel_talks.csv", "poster_talks.csv", ALL_TALKS, STATISTICS] {
            assert!(year.join(name).is_file(), "{name}");
        }
        assert!(dir.path().join(SUMMARY).is_file());

        let plenary = fs::read_to_string(year.join("plenary_talks.csv")).unwrap();
        let mut lines = plenary.lines();
        assert_eq!(
            lines.next(),
            Some("Year,Type,Title,Speaker,Institute,Country,Session,Country_Confidence")
        );
        assert_eq!(lines.next(), Some("2019,plenary,Flow,A. Lee,Fermilab,USA,,source"));
        assert_eq!(lines.next(), None);

        let all = fs::read_to_string(year.join(ALL_TALKS)).unwrap();
        assert_eq!(all.lines().count(), 5);
        assert!(all.contains("B. Wu,Nowhere Institute,Nowhere Institute,,fallback"));
        assert!(all.contains("\"Lab of Things, Place\",Place,,fallback"));
        assert!(!all.contains("E. Poe"));
    }

    #[test]
    fn statistics_json_carries_year() {
        let dir = tempdir().unwrap();
        write_all(dir.path(), &result()).unwrap();
        let text = fs::read_to_string(dir.path().join("2019").join(STATISTICS)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["year"], "2019");
        assert_eq!(json["total_main"], 4);
        assert_eq!(json["dropped"]["flash"], 1);
        assert_eq!(json["unknown_countries"]["total"], 0);
        assert_eq!(json["confidence"]["fallback"], 3);
    }

    #[test]
    fn unknown_institutes_ranked_by_count() {
        let r = result();
        let unknown = unknown_institutes(r.editions.iter().flat_map(|e| e.records.iter()));
        assert_eq!(
            unknown,
            vec![("Nowhere Institute".to_string(), 2), ("Lab of Things, Place".to_string(), 1)]
        );
    }

    #[test]
    fn unknown_template_has_blank_countries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curation").join("unknown_institutes.csv");
        let n = write_unknown_institutes(&path, &result()).unwrap();
        assert_eq!(n, 2);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Institute,Country\nNowhere Institute,\n\"Lab of Things, Place\",\n");

        let rules = crate::mappings::load_rules(&path).unwrap().unwrap();
        assert_eq!(rules[0].pattern, "Nowhere Institute");
        assert_eq!(rules[0].country, "");
    }

    #[test]
    fn unwritable_output_is_write_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = write_all(&blocker, &result()).unwrap_err();
        assert!(err.is_write());
    }
}
