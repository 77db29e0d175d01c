// qmeta run - load, resolve, reconcile, export

use std::path::{Path, PathBuf};

use qmeta_io::{export, talks};
use qmeta_recon::stats::TalkStats;
use qmeta_recon::{PipelineResult, ReconcileOptions};

use crate::exit_codes::EXIT_INPUT;
use crate::pipeline::{self, Overrides};
use crate::{print_json, CliError};

pub fn cmd_run(
    config: Option<&Path>,
    overrides: Overrides,
    unknowns_out: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let settings = pipeline::load_settings(config, overrides)?;
    let tables = pipeline::load_tables(&settings)?;
    let participants = pipeline::load_participants(&settings)?;

    let raw_dir = settings.raw_dir();
    let input = talks::load_editions(&raw_dir, &settings.years).map_err(|e| {
        CliError::io(e).with_hint("pass --data-dir pointing at a tree with raw/<year>/talks.json")
    })?;
    if input.editions.is_empty() {
        return Err(CliError {
            code: EXIT_INPUT,
            message: format!("no editions found under {}", raw_dir.display()),
            hint: Some("expected raw/<year>/talks.json or raw/<year>/talks.csv".to_string()),
        });
    }

    let options = ReconcileOptions { min_fuzzy_name_len: settings.reconcile.min_fuzzy_name_len };
    let result = qmeta_recon::run(&tables, participants.as_ref(), input, &options);

    let out_dir = settings.output_dir();
    let written = export::write_all(&out_dir, &result).map_err(CliError::io)?;
    if let Some(path) = &unknowns_out {
        export::write_unknown_institutes(path, &result).map_err(CliError::io)?;
    }

    if json {
        print_json(&result)
    } else {
        print_summary(&result);
        println!("wrote {} file(s) to {}", written.len(), out_dir.display());
        if let Some(path) = unknowns_out {
            println!("unknown institutes template: {}", path.display());
        }
        Ok(())
    }
}

fn print_summary(result: &PipelineResult) {
    println!(
        "{:<6} {:>6} {:>8} {:>8} {:>6} {:>7} {:>9} {:>9} {:>9} {:>8}",
        "year", "talks", "plenary", "parallel", "poster", "dropped", "unk.inst", "unk.ctry",
        "countries", "HHI"
    );
    for edition in &result.editions {
        print_row(&edition.year, &edition.stats);
    }
    print_row("total", &result.summary.totals);

    let r = &result.summary.reconcile;
    println!();
    println!(
        "reconciliation: {} field(s) filled (exact {}, fuzzy {}, fixup {}) in {} round(s)",
        r.filled(),
        r.institutes_exact + r.countries_exact,
        r.institutes_fuzzy + r.countries_fuzzy,
        r.countries_fixup,
        r.rounds
    );
    if !result.summary.resolved_by_rule.is_empty() {
        let rules: Vec<String> =
            result.summary.resolved_by_rule.iter().map(|(k, n)| format!("{k} {n}")).collect();
        println!("resolver: {}", rules.join(", "));
    }
    println!("unresolved countries: {}", r.unresolved);
}

fn print_row(label: &str, s: &TalkStats) {
    println!(
        "{:<6} {:>6} {:>8} {:>8} {:>6} {:>7} {:>9} {:>9} {:>9} {:>8.1}",
        label,
        s.total_main,
        s.talks.plenary,
        s.talks.parallel,
        s.talks.poster,
        s.dropped.total(),
        s.unknown_institutes.total,
        s.unknown_countries.total,
        s.distinct_countries,
        s.hhi
    );
}
