use serde::{Deserialize, Serialize};

/// Placeholder written for a missing institute or country.
pub const SENTINEL: &str = "Unknown";

/// How a field value was obtained.
///
/// Variants are declared weakest first so the derived `Ord` ranks
/// `Source > Exact > Fuzzy > Fallback > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// No value.
    Unknown,
    /// Best-effort guess (last comma segment, unmapped country code).
    Fallback,
    /// Keyword/alias substring or fuzzy speaker-name match.
    Fuzzy,
    /// Explicit country marker, institute table hit, or exact speaker match.
    Exact,
    /// Present in the upstream data.
    Source,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Fallback => write!(f, "fallback"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::Exact => write!(f, "exact"),
            Self::Source => write!(f, "source"),
        }
    }
}

/// A possibly-missing field value tagged with its confidence.
///
/// `value` is `None` exactly when `confidence` is [`Confidence::Unknown`];
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    value: Option<String>,
    confidence: Confidence,
}

impl Resolution {
    pub fn unknown() -> Self {
        Self { value: None, confidence: Confidence::Unknown }
    }

    /// Build a resolution; empty or sentinel values collapse to unknown.
    pub fn new(value: impl Into<String>, confidence: Confidence) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if confidence == Confidence::Unknown || is_missing(trimmed) {
            return Self::unknown();
        }
        let value = if trimmed.len() == value.len() { value } else { trimmed.to_string() };
        Self { value: Some(value), confidence }
    }

    /// Value as it arrived from upstream data.
    pub fn source(value: impl Into<String>) -> Self {
        Self::new(value, Confidence::Source)
    }

    pub fn exact(value: impl Into<String>) -> Self {
        Self::new(value, Confidence::Exact)
    }

    pub fn fuzzy(value: impl Into<String>) -> Self {
        Self::new(value, Confidence::Fuzzy)
    }

    pub fn fallback(value: impl Into<String>) -> Self {
        Self::new(value, Confidence::Fallback)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn is_known(&self) -> bool {
        self.value.is_some()
    }

    /// The value, or the sentinel when unknown.
    pub fn display(&self) -> &str {
        self.value.as_deref().unwrap_or(SENTINEL)
    }

    /// Same value with its confidence capped at `ceiling`.
    pub fn capped(&self, ceiling: Confidence) -> Self {
        match &self.value {
            Some(v) => Self { value: Some(v.clone()), confidence: self.confidence.min(ceiling) },
            None => Self::unknown(),
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::unknown()
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}

/// True for the empty string and the sentinel (case-insensitive).
pub fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case(SENTINEL)
}
