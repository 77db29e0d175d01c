use std::collections::BTreeMap;

use serde::Serialize;

use qmeta_core::{TalkRecord, TalkType};

/// Counts per analyzed talk type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub plenary: usize,
    pub parallel: usize,
    pub poster: usize,
    pub total: usize,
}

impl TypeCounts {
    fn add(&mut self, talk_type: TalkType) {
        match talk_type {
            TalkType::Plenary => self.plenary += 1,
            TalkType::Parallel => self.parallel += 1,
            TalkType::Poster => self.poster += 1,
            TalkType::Flash | TalkType::Other => return,
        }
        self.total += 1;
    }
}

/// Talks removed by type filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DroppedCounts {
    pub flash: usize,
    pub other: usize,
}

impl DroppedCounts {
    pub fn add(&mut self, talk_type: TalkType) {
        match talk_type {
            TalkType::Flash => self.flash += 1,
            TalkType::Other => self.other += 1,
            _ => {}
        }
    }

    pub fn merge(&mut self, other: &DroppedCounts) {
        self.flash += other.flash;
        self.other += other.other;
    }

    pub fn total(&self) -> usize {
        self.flash + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalkStats {
    /// Plenary + parallel + poster talks.
    pub total_main: usize,
    pub talks: TypeCounts,
    pub dropped: DroppedCounts,
    pub unknown_institutes: TypeCounts,
    pub unknown_countries: TypeCounts,
    /// Talks per known country, fallback guesses included.
    pub countries: BTreeMap<String, usize>,
    pub distinct_countries: usize,
    /// Herfindahl-Hirschman index of `countries`, 0..=10000.
    pub hhi: f64,
    /// Country confidence histogram.
    pub confidence: BTreeMap<String, usize>,
}

/// Statistics over analyzed records. Records of dropped types are ignored;
/// pass their counts in `dropped`.
pub fn compute<'a, I>(records: I, dropped: DroppedCounts) -> TalkStats
where
    I: IntoIterator<Item = &'a TalkRecord>,
{
    let mut talks = TypeCounts::default();
    let mut unknown_institutes = TypeCounts::default();
    let mut unknown_countries = TypeCounts::default();
    let mut countries: BTreeMap<String, usize> = BTreeMap::new();
    let mut confidence: BTreeMap<String, usize> = BTreeMap::new();

    for r in records.into_iter().filter(|r| r.talk_type.is_analyzed()) {
        talks.add(r.talk_type);
        if !r.institute.is_known() {
            unknown_institutes.add(r.talk_type);
        }
        match r.country.value() {
            Some(c) => *countries.entry(c.to_string()).or_insert(0) += 1,
            None => unknown_countries.add(r.talk_type),
        }
        *confidence.entry(r.country.confidence().to_string()).or_insert(0) += 1;
    }

    TalkStats {
        total_main: talks.total,
        talks,
        dropped,
        unknown_institutes,
        unknown_countries,
        distinct_countries: countries.len(),
        hhi: hhi(&countries),
        countries,
        confidence,
    }
}

/// Sum of squared percentage shares. 10000 means a single country; 0 for
/// no data.
pub fn hhi(counts: &BTreeMap<String, usize>) -> f64 {
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .values()
        .map(|&n| {
            let share = n as f64 / total;
            share * share
        })
        .sum::<f64>()
        * 10000.0
}
