use std::collections::BTreeMap;

use qmeta_config::Tables;
use qmeta_core::names::{best_match, normalize_name, swapped_form};
use qmeta_core::{Confidence, Resolution, TalkRecord};

use crate::model::ReconcileSummary;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// An unresolved record's speaker name must be longer than this (in
    /// characters) to be fuzzy matched. The resolved name it borrows from
    /// may be shorter.
    pub min_fuzzy_name_len: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { min_fuzzy_name_len: 5 }
    }
}

/// Known (institute, country) of a speaker, taken from the first fully
/// known record of that speaker.
#[derive(Debug, Clone)]
struct Donor {
    institute: Resolution,
    country: Resolution,
}

/// Fill unknown institutes and countries from other records of the same
/// speaker, then from the fixup table.
///
/// Rounds repeat until nothing changes, so calling this again on its own
/// output is a no-op. Known fields are never overwritten.
pub fn reconcile(
    records: &mut [TalkRecord],
    tables: &Tables,
    options: &ReconcileOptions,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    loop {
        summary.rounds += 1;
        let index = build_index(records);
        let mut changed = false;

        for record in records.iter_mut() {
            if record.is_fully_known() {
                continue;
            }
            let key = speaker_key(&record.speaker);
            if key.is_empty() {
                continue;
            }

            let (donor, ceiling) = match index.get(&key) {
                Some(d) => (d, Confidence::Exact),
                None => {
                    let keys = index.keys().map(String::as_str);
                    match best_match(&key, keys, options.min_fuzzy_name_len) {
                        Some(hit) => (&index[hit], Confidence::Fuzzy),
                        None => continue,
                    }
                }
            };

            let (inst, ctry) = fill(record, donor, ceiling);
            match ceiling {
                Confidence::Exact => {
                    summary.institutes_exact += inst as usize;
                    summary.countries_exact += ctry as usize;
                }
                _ => {
                    summary.institutes_fuzzy += inst as usize;
                    summary.countries_fuzzy += ctry as usize;
                }
            }
            changed |= inst || ctry;
        }

        for record in records.iter_mut() {
            if record.country.is_known() {
                continue;
            }
            let Some(institute) = record.institute.value() else { continue };
            if let Some(rule) = tables.match_fixup(institute) {
                log::debug!("fixup '{}' -> {} for '{institute}'", rule.pattern, rule.country);
                record.country = Resolution::exact(rule.country.as_str());
                summary.countries_fixup += 1;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    summary.unresolved = records.iter().filter(|r| !r.country.is_known()).count();
    log::info!(
        "reconciled {} records in {} round(s): {} fields filled, {} countries unresolved",
        records.len(),
        summary.rounds,
        summary.filled(),
        summary.unresolved
    );
    summary
}

fn speaker_key(speaker: &str) -> String {
    normalize_name(speaker).to_lowercase()
}

/// Speaker index over fully known records. As-written names are registered
/// before swapped forms; the first record of a key wins.
fn build_index(records: &[TalkRecord]) -> BTreeMap<String, Donor> {
    let mut index = BTreeMap::new();
    let mut swapped = Vec::new();

    for record in records.iter().filter(|r| r.is_fully_known()) {
        let key = speaker_key(&record.speaker);
        if key.is_empty() {
            continue;
        }
        let donor = Donor { institute: record.institute.clone(), country: record.country.clone() };
        if let Some(alt) = swapped_form(&key) {
            swapped.push((alt, donor.clone()));
        }
        index.entry(key).or_insert(donor);
    }
    for (key, donor) in swapped {
        index.entry(key).or_insert(donor);
    }
    index
}

/// Copy the donor's values into the record's unknown fields. Returns which
/// fields were filled.
fn fill(record: &mut TalkRecord, donor: &Donor, ceiling: Confidence) -> (bool, bool) {
    let mut filled = (false, false);
    if !record.institute.is_known() && donor.institute.is_known() {
        record.institute = donor.institute.capped(ceiling);
        filled.0 = true;
    }
    if !record.country.is_known() && donor.country.is_known() {
        record.country = donor.country.capped(ceiling);
        filled.1 = true;
    }
    filled
}
