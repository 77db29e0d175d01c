use std::collections::BTreeMap;

use serde::Serialize;

use qmeta_core::{Resolution, TalkRecord};

use crate::stats::TalkStats;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Which resolver rule produced a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    CountryCode,
    TrailingSegment,
    Institute,
    Keyword,
    Fallback,
    Participant,
    None,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CountryCode => write!(f, "country_code"),
            Self::TrailingSegment => write!(f, "trailing_segment"),
            Self::Institute => write!(f, "institute"),
            Self::Keyword => write!(f, "keyword"),
            Self::Fallback => write!(f, "fallback"),
            Self::Participant => write!(f, "participant"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Resolver output for one affiliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affiliation {
    pub institute: Resolution,
    pub country: Resolution,
    pub rule: MatchRule,
    /// The code, pattern, keyword or participant name that matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

impl Affiliation {
    pub fn unknown() -> Self {
        Self {
            institute: Resolution::unknown(),
            country: Resolution::unknown(),
            rule: MatchRule::None,
            matched: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub institutes_exact: usize,
    pub countries_exact: usize,
    pub institutes_fuzzy: usize,
    pub countries_fuzzy: usize,
    pub countries_fixup: usize,
    pub rounds: usize,
    /// Records whose country is still unknown afterwards.
    pub unresolved: usize,
}

impl ReconcileSummary {
    pub fn filled(&self) -> usize {
        self.institutes_exact
            + self.countries_exact
            + self.institutes_fuzzy
            + self.countries_fuzzy
            + self.countries_fixup
    }
}

// ---------------------------------------------------------------------------
// Pipeline input
// ---------------------------------------------------------------------------

/// All loaded talks of one edition, before filtering.
#[derive(Debug, Clone)]
pub struct Edition {
    pub year: String,
    pub records: Vec<TalkRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub editions: Vec<Edition>,
}

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EditionResult {
    pub year: String,
    pub stats: TalkStats,
    #[serde(skip)]
    pub records: Vec<TalkRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub editions: usize,
    pub talks: usize,
    /// Countries filled by the resolver, per rule.
    pub resolved_by_rule: BTreeMap<String, usize>,
    pub reconcile: ReconcileSummary,
    pub totals: TalkStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub meta: RunMeta,
    pub summary: PipelineSummary,
    pub editions: Vec<EditionResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
    pub min_fuzzy_name_len: usize,
}
