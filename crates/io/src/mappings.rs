// Institute,Country mapping files

use std::path::Path;

use qmeta_config::InstituteRule;

use crate::csv::read_rows;
use crate::error::IoError;

/// Rules from a mapping CSV, or `None` when the file does not exist.
///
/// The first row is skipped when it is an `Institute,Country` header. Rows
/// with fewer than two fields or an empty institute are skipped with a
/// warning. A blank country is kept; the tables drop such rules.
pub fn load_rules(path: &Path) -> Result<Option<Vec<InstituteRule>>, IoError> {
    if !path.exists() {
        log::warn!("mapping file {} not found, using built-in tables", path.display());
        return Ok(None);
    }
    let rules = rules_from_rows(path, read_rows(path)?);
    log::info!("{}: {} rule(s)", path.display(), rules.len());
    Ok(Some(rules))
}

fn rules_from_rows(path: &Path, rows: Vec<Vec<String>>) -> Vec<InstituteRule> {
    let mut rules = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        if i == 0 && is_header(&row) {
            continue;
        }
        match row.as_slice() {
            [pattern, country, ..] if !pattern.is_empty() => {
                rules.push(InstituteRule::new(pattern.as_str(), country.as_str()));
            }
            _ => log::warn!("{}: skipping malformed row {}: {:?}", path.display(), i + 1, row),
        }
    }
    rules
}

fn is_header(row: &[String]) -> bool {
    matches!(row, [a, b, ..] if a.eq_ignore_ascii_case("institute") && b.eq_ignore_ascii_case("country"))
}
