// Integration tests for the qmeta binary: exit codes and the --json stdout
// contract (exactly one JSON value on stdout, logs on stderr).

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

/// A qmeta command isolated from the user's settings file.
fn qmeta(workdir: &Path) -> Command {
    let config = workdir.join("qmeta.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qmeta"));
    cmd.current_dir(workdir);
    cmd.env("QMETA_CONFIG", &config);
    cmd.env_remove("QMETA_LOG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert stdout is a single, parseable JSON value.
fn single_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty\nstderr: {}", stderr(output));
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\nstdout:\n{trimmed}"))
}

/// data/raw/2019/talks.json and data/raw/2022/talks.csv
fn staged_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("data").join("raw");
    fs::create_dir_all(raw.join("2019")).unwrap();
    fs::create_dir_all(raw.join("2022")).unwrap();
    fs::write(
        raw.join("2019").join("talks.json"),
        r#"[
  {"Title": "Flow", "Speaker": "A. Lee", "Institute": "Fermilab", "Country": "USA", "Type": "Plenary"},
  {"Title": "Jets", "Speaker": "A. Lee", "Institute": "Unknown", "Country": "Unknown", "Type": "Parallel"},
  {"Title": "HBT", "Speaker": "B. Wu", "Institute": "CERN (CH)", "Country": "", "Type": "Poster"},
  {"Title": "Quick", "Speaker": "C. Chen", "Institute": "KEK", "Country": "", "Type": "Flash"}
]"#,
    )
    .unwrap();
    fs::write(
        raw.join("2022").join("talks.csv"),
        "Title,Speaker,Affiliation,Country,Session,Type\n\
         Photons,D. Roe,\"Dept. of Physics, JYFL\",,S1,Parallel\n\
         Dileptons,A. Lee,,,S2,Poster\n",
    )
    .unwrap();
    dir
}

// ===========================================================================
// qmeta run
// ===========================================================================

#[test]
fn run_json_summary_and_processed_tree() {
    let dir = staged_tree();
    let output = qmeta(dir.path()).args(["run", "--data-dir", "data", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = single_json(&output);
    assert_eq!(json["summary"]["editions"], 2);
    assert_eq!(json["summary"]["talks"], 5);
    assert_eq!(json["editions"][0]["year"], "2019");
    assert_eq!(json["editions"][0]["stats"]["dropped"]["flash"], 1);
    assert_eq!(json["editions"][0]["stats"]["countries"]["USA"], 2);
    assert_eq!(json["editions"][1]["stats"]["countries"]["Finland"], 1);
    // A. Lee's 2022 poster borrows the 2019 affiliation.
    assert_eq!(json["editions"][1]["stats"]["countries"]["USA"], 1);
    assert!(json["meta"]["engine_version"].is_string());

    let processed = dir.path().join("data").join("processed");
    for year in ["2019", "2022"] {
        for name in ["plenary_talks.csv", "parallel_talks.csv", "poster_talks.csv", "all_talks.csv", "statistics.json"] {
            assert!(processed.join(year).join(name).is_file(), "{year}/{name}");
        }
    }
    assert!(processed.join("summary.json").is_file());

    let posters = fs::read_to_string(processed.join("2022").join("poster_talks.csv")).unwrap();
    assert!(posters.contains("2022,poster,Dileptons,A. Lee,Fermilab,USA,S2,exact"), "{posters}");
}

#[test]
fn run_human_output_has_table() {
    let dir = staged_tree();
    let output = qmeta(dir.path()).args(["run", "--data-dir", "data", "-q"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().next().unwrap().starts_with("year"));
    assert!(stdout.contains("2019"));
    assert!(stdout.contains("total"));
    assert!(stdout.contains("reconciliation:"));
}

#[test]
fn run_year_filter_skips_missing_editions() {
    let dir = staged_tree();
    let output = qmeta(dir.path())
        .args(["run", "--data-dir", "data", "--year", "2022", "--year", "2030", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    assert_eq!(json["summary"]["editions"], 1);
    assert_eq!(json["editions"][0]["year"], "2022");
    assert!(stderr(&output).contains("skipping edition 2030"));
}

#[test]
fn run_writes_unknowns_template() {
    let dir = staged_tree();
    let output = qmeta(dir.path())
        .args(["run", "--data-dir", "data", "--unknowns-out", "curation/unknown.csv", "-q"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = fs::read_to_string(dir.path().join("curation").join("unknown.csv")).unwrap();
    assert!(text.starts_with("Institute,Country\n"));
}

#[test]
fn run_mapping_file_overrides_builtin() {
    let dir = staged_tree();
    fs::write(dir.path().join("fixes.csv"), "Institute,Country\nKEK,Korea\nCERN,France\n").unwrap();
    let output = qmeta(dir.path())
        .args(["run", "--data-dir", "data", "--mappings", "fixes.csv", "--mappings", "absent.csv", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    // Trailing (CH) outranks the institute table.
    assert_eq!(json["editions"][0]["stats"]["countries"]["Switzerland"], 1);
    assert!(stderr(&output).contains("absent.csv"));
}

#[test]
fn run_without_editions_is_input_error() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data").join("raw")).unwrap();
    let output = qmeta(dir.path()).args(["run", "--data-dir", "data"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("error: no editions found"));
    assert!(stderr(&output).contains("hint:"));
}

#[test]
fn run_missing_data_dir_is_input_error() {
    let dir = tempdir().unwrap();
    let output = qmeta(dir.path()).args(["run", "--data-dir", "nowhere"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn run_unwritable_output_is_output_error() {
    let dir = staged_tree();
    fs::write(dir.path().join("blocker"), "not a directory").unwrap();
    let output = qmeta(dir.path())
        .args(["run", "--data-dir", "data", "--output-dir", "blocker"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5), "stderr: {}", stderr(&output));
}

#[test]
fn bad_settings_file_is_config_error() {
    let dir = staged_tree();
    fs::write(dir.path().join("qmeta.toml"), "colour = \"blue\"\n").unwrap();
    let output = qmeta(dir.path()).args(["run", "--data-dir", "data"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn settings_file_supplies_inline_rules() {
    let dir = staged_tree();
    fs::write(
        dir.path().join("qmeta.toml"),
        "data_dir = \"data\"\n\n[[tables.institutes]]\npattern = \"Fermilab Theory\"\ncountry = \"Canada\"\n",
    )
    .unwrap();
    let output =
        qmeta(dir.path()).args(["resolve", "Fermilab Theory Group", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(single_json(&output)["country"]["value"], "Canada");
}

#[test]
fn bad_year_is_usage_error() {
    let dir = tempdir().unwrap();
    let output = qmeta(dir.path()).args(["run", "--year", "twenty"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// qmeta resolve
// ===========================================================================

#[test]
fn resolve_json_explains_rule() {
    let dir = tempdir().unwrap();
    let output = qmeta(dir.path()).args(["resolve", "CERN (CH)", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    assert_eq!(json["affiliation"], "CERN (CH)");
    assert_eq!(json["institute"]["value"], "CERN (CH)");
    assert_eq!(json["country"]["value"], "Switzerland");
    assert_eq!(json["country"]["confidence"], "exact");
    assert_eq!(json["rule"], "country_code");
    assert_eq!(json["matched"], "CH");
    assert!(json.get("speaker").is_none());
}

#[test]
fn resolve_human_output() {
    let dir = tempdir().unwrap();
    let output = qmeta(dir.path()).args(["resolve", "Yale University"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("country:     USA (fuzzy)"), "{stdout}");
    assert!(stdout.contains("rule:        keyword [Yale]"), "{stdout}");
}

#[test]
fn resolve_speaker_from_participants() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("participants.csv"),
        "name,affiliation,country,year\n\"Ollitrault, Jean-Yves\",IPhT Saclay,FR,2019\n",
    )
    .unwrap();
    let output = qmeta(dir.path())
        .args(["resolve", "", "--speaker", "Jean-Yves Ollitrault", "--participants", "participants.csv", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    assert_eq!(json["rule"], "participant");
    assert_eq!(json["institute"]["value"], "IPhT Saclay");
    assert_eq!(json["country"]["value"], "France");
    assert_eq!(json["speaker"], "Jean-Yves Ollitrault");
}

#[test]
fn resolve_speaker_with_country_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("participants.csv"), "name,country\nJean-Yves Ollitrault,France\n").unwrap();
    let output = qmeta(dir.path())
        .args(["resolve", "", "--speaker", "Jean-Yves Ollitrault", "--participants", "participants.csv", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    assert_eq!(json["rule"], "participant");
    assert_eq!(json["country"]["value"], "France");
}

#[test]
fn resolve_reads_mapping_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("extra.csv"), "Institute,Country\nSomewhere Lab,Atlantis\n").unwrap();
    let output = qmeta(dir.path())
        .args(["resolve", "Somewhere Lab, Physics", "--mappings", "extra.csv", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    assert_eq!(json["rule"], "institute");
    assert_eq!(json["country"]["value"], "Atlantis");
}

#[test]
fn resolve_empty_without_speaker_is_usage_error() {
    let dir = tempdir().unwrap();
    let output = qmeta(dir.path()).args(["resolve", " "]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--speaker"));
}

// ===========================================================================
// qmeta tables
// ===========================================================================

#[test]
fn tables_json_lists_everything() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("extra.csv"), "Somewhere Lab,Atlantis\n").unwrap();
    let output = qmeta(dir.path()).args(["tables", "--mappings", "extra.csv", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = single_json(&output);
    for key in ["country_codes", "countries", "institutes", "fixups"] {
        assert!(json[key].as_array().is_some_and(|a| !a.is_empty()), "{key}");
    }
    assert_eq!(json["institutes"][0]["pattern"], "Somewhere Lab");
    let countries = json["countries"].as_array().unwrap();
    assert!(countries.iter().any(|c| c["name"] == "Atlantis"));
}

#[test]
fn tables_human_counts() {
    let dir = tempdir().unwrap();
    let output = qmeta(dir.path()).arg("tables").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("country codes:"));
    assert!(stdout.contains("institutes:"));
}
