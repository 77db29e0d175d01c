use serde::Serialize;

use crate::resolution::Resolution;

// ---------------------------------------------------------------------------
// Talk type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TalkType {
    Plenary,
    Parallel,
    Poster,
    Flash,
    Other,
}

impl TalkType {
    /// Types that survive filtering, in output order.
    pub const ANALYZED: [TalkType; 3] = [TalkType::Plenary, TalkType::Parallel, TalkType::Poster];

    /// Parse the upstream `Type` column. Anything unrecognized is `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plenary" => Self::Plenary,
            "parallel" => Self::Parallel,
            "poster" => Self::Poster,
            "flash" => Self::Flash,
            _ => Self::Other,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, Self::Plenary | Self::Parallel | Self::Poster)
    }

    /// File stem used for per-type exports (`plenary_talks`, ...).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Plenary => "plenary_talks",
            Self::Parallel => "parallel_talks",
            Self::Poster => "poster_talks",
            Self::Flash => "flash_talks",
            Self::Other => "other_talks",
        }
    }
}

impl std::fmt::Display for TalkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plenary => write!(f, "plenary"),
            Self::Parallel => write!(f, "parallel"),
            Self::Poster => write!(f, "poster"),
            Self::Flash => write!(f, "flash"),
            Self::Other => write!(f, "other"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One talk of one conference edition.
///
/// `institute` holds the affiliation string as entered by the speaker; the
/// resolver only ever fills it, never rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalkRecord {
    pub year: String,
    pub talk_type: TalkType,
    pub title: String,
    pub session: String,
    pub speaker: String,
    pub institute: Resolution,
    pub country: Resolution,
}

impl TalkRecord {
    /// Record built from raw upstream strings. Empty and sentinel values
    /// become unknown resolutions.
    pub fn new(
        year: impl Into<String>,
        talk_type: TalkType,
        speaker: impl Into<String>,
        institute: &str,
        country: &str,
    ) -> Self {
        Self {
            year: year.into(),
            talk_type,
            title: String::new(),
            session: String::new(),
            speaker: crate::names::normalize_name(&speaker.into()),
            institute: Resolution::source(institute),
            country: Resolution::source(country),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    pub fn is_fully_known(&self) -> bool {
        self.institute.is_known() && self.country.is_known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::Confidence;

    #[test]
    fn parse_talk_types() {
        assert_eq!(TalkType::parse("Plenary"), TalkType::Plenary);
        assert_eq!(TalkType::parse(" parallel "), TalkType::Parallel);
        assert_eq!(TalkType::parse("POSTER"), TalkType::Poster);
        assert_eq!(TalkType::parse("flash"), TalkType::Flash);
        assert_eq!(TalkType::parse("unknown_parallel"), TalkType::Other);
        assert_eq!(TalkType::parse(""), TalkType::Other);
    }

    #[test]
    fn only_three_types_are_analyzed() {
        assert!(TalkType::Plenary.is_analyzed());
        assert!(TalkType::Poster.is_analyzed());
        assert!(!TalkType::Flash.is_analyzed());
        assert!(!TalkType::Other.is_analyzed());
        assert!(TalkType::ANALYZED.iter().all(|t| t.is_analyzed()));
    }

    #[test]
    fn new_record_maps_sentinels() {
        let r = TalkRecord::new("2019", TalkType::Plenary, "  A.  Lee ", "Unknown", "");
        assert_eq!(r.speaker, "A. Lee");
        assert!(!r.institute.is_known());
        assert!(!r.country.is_known());
        assert!(!r.is_fully_known());

        let r = TalkRecord::new("2019", TalkType::Plenary, "A. Lee", "Fermilab", "USA");
        assert!(r.is_fully_known());
        assert_eq!(r.country.confidence(), Confidence::Source);
    }
}
