use std::collections::BTreeMap;

use serde::Serialize;

use qmeta_core::names::{best_match, normalize_name, swapped_form};
use qmeta_core::resolution::is_missing;
use qmeta_core::Confidence;

/// One row of the participants list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub name: String,
    pub affiliation: String,
    pub country: String,
}

/// Registered participants keyed by lower-cased name.
///
/// Each name is registered as written and in its swapped order
/// ("Last, First" / "First Last"). The first registration of a key wins.
/// Participants with neither an affiliation nor a country are not
/// registered.
#[derive(Debug, Clone, Default)]
pub struct ParticipantDirectory {
    entries: Vec<Participant>,
    index: BTreeMap<String, usize>,
    min_fuzzy_name_len: usize,
}

impl ParticipantDirectory {
    pub fn new(participants: Vec<Participant>, min_fuzzy_name_len: usize) -> Self {
        let mut dir = Self { entries: Vec::new(), index: BTreeMap::new(), min_fuzzy_name_len };
        let mut swapped = Vec::new();

        for mut p in participants {
            p.name = normalize_name(&p.name);
            p.affiliation = p.affiliation.trim().to_string();
            if p.name.is_empty() || (is_missing(&p.affiliation) && is_missing(&p.country)) {
                continue;
            }
            let idx = dir.entries.len();
            dir.index.entry(p.name.to_lowercase()).or_insert(idx);
            if let Some(alt) = swapped_form(&p.name) {
                swapped.push((alt.to_lowercase(), idx));
            }
            dir.entries.push(p);
        }
        // As-written names take precedence over swapped forms.
        for (key, idx) in swapped {
            dir.index.entry(key).or_insert(idx);
        }

        log::debug!(
            "participant directory: {} entries, {} keys",
            dir.entries.len(),
            dir.index.len()
        );
        dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find `speaker`: exact name first, then the scored fuzzy match.
    /// The confidence says which of the two matched.
    pub fn lookup(&self, speaker: &str) -> Option<(&Participant, Confidence)> {
        let key = normalize_name(speaker).to_lowercase();
        if key.is_empty() {
            return None;
        }
        if let Some(&idx) = self.index.get(&key) {
            return Some((&self.entries[idx], Confidence::Exact));
        }
        let hit = best_match(&key, self.index.keys().map(String::as_str), self.min_fuzzy_name_len)?;
        let idx = self.index[hit];
        Some((&self.entries[idx], Confidence::Fuzzy))
    }
}
