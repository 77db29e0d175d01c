use qmeta_config::Tables;
use qmeta_core::resolution::is_missing;
use qmeta_core::{Confidence, Resolution};

use crate::model::{Affiliation, MatchRule};
use crate::participants::{Participant, ParticipantDirectory};

/// Resolves free-text affiliations to (institute, country).
///
/// Country precedence, first match wins:
/// 1. trailing `(XX)` country code
/// 2. last comma segment (the whole string when there is no comma) naming
///    a country or one of its keywords
/// 3. institute table
/// 4. country name/alias/keyword anywhere in the string
/// 5. last comma segment as a low-confidence guess
///
/// When a participant directory is attached, an empty affiliation is looked
/// up there by speaker name. So is the country of an affiliation that only
/// reached the fallback guess.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    tables: &'a Tables,
    participants: Option<&'a ParticipantDirectory>,
}

impl<'a> Resolver<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables, participants: None }
    }

    pub fn with_participants(mut self, participants: &'a ParticipantDirectory) -> Self {
        self.participants = Some(participants);
        self
    }

    pub fn tables(&self) -> &'a Tables {
        self.tables
    }

    pub fn resolve(&self, affiliation: &str, speaker: Option<&str>) -> Affiliation {
        if !is_missing(affiliation) {
            let affiliation = affiliation.trim();
            let (country, rule, matched) = self.resolve_country(affiliation);
            let resolved = Affiliation {
                institute: Resolution::source(affiliation),
                country,
                rule,
                matched,
            };
            if matches!(rule, MatchRule::Fallback | MatchRule::None) {
                if let (Some(dir), Some(speaker)) = (self.participants, speaker) {
                    return self.country_from_participant(dir, speaker, resolved);
                }
            }
            return resolved;
        }
        match (self.participants, speaker) {
            (Some(dir), Some(speaker)) => self.from_participant(dir, speaker),
            _ => Affiliation::unknown(),
        }
    }

    /// Country for a non-empty affiliation, with the rule that produced it
    /// and the term that matched.
    pub fn resolve_country(&self, affiliation: &str) -> (Resolution, MatchRule, Option<String>) {
        let t = self.tables;

        if let Some(code) = trailing_code(affiliation) {
            return match t.country_for_code(code) {
                Some(country) => (Resolution::exact(country), MatchRule::CountryCode, Some(code.into())),
                None => (Resolution::fallback(code), MatchRule::CountryCode, Some(code.into())),
            };
        }

        let last = affiliation.rsplit(',').next().unwrap_or_default();
        if let Some(country) = t.country_for_segment(last) {
            return (
                Resolution::exact(country),
                MatchRule::TrailingSegment,
                Some(last.trim().to_string()),
            );
        }

        if let Some(rule) = t.match_institute(affiliation) {
            return (
                Resolution::exact(rule.country.as_str()),
                MatchRule::Institute,
                Some(rule.pattern.clone()),
            );
        }

        if let Some((country, term)) = t.match_keyword(affiliation) {
            return (Resolution::fuzzy(country), MatchRule::Keyword, Some(term.to_string()));
        }

        let last = affiliation.rsplit(',').next().unwrap_or_default().trim();
        let guess = Resolution::fallback(last);
        if guess.is_known() {
            (guess, MatchRule::Fallback, None)
        } else {
            (Resolution::unknown(), MatchRule::None, None)
        }
    }

    fn from_participant(&self, dir: &ParticipantDirectory, speaker: &str) -> Affiliation {
        let Some((p, conf)) = dir.lookup(speaker) else {
            return Affiliation::unknown();
        };
        log::debug!("speaker '{speaker}' matched participant '{}' ({conf})", p.name);
        Affiliation {
            institute: Resolution::new(p.affiliation.as_str(), conf),
            country: self.participant_country(p, conf),
            rule: MatchRule::Participant,
            matched: Some(p.name.clone()),
        }
    }

    /// Replace a fallback or missing country of `resolved` with the
    /// participant's, keeping the record's own institute.
    fn country_from_participant(
        &self,
        dir: &ParticipantDirectory,
        speaker: &str,
        resolved: Affiliation,
    ) -> Affiliation {
        let Some((p, conf)) = dir.lookup(speaker) else {
            return resolved;
        };
        let country = self.participant_country(p, conf);
        if country.confidence() <= resolved.country.confidence() {
            return resolved;
        }
        log::debug!("speaker '{speaker}' takes country from participant '{}' ({conf})", p.name);
        Affiliation {
            country,
            rule: MatchRule::Participant,
            matched: Some(p.name.clone()),
            ..resolved
        }
    }

    /// The participant's stated country, or the one resolved from their
    /// affiliation, capped at `conf`.
    fn participant_country(&self, p: &Participant, conf: Confidence) -> Resolution {
        match self.tables.canonical_country(&p.country) {
            Some(c) => Resolution::new(c, conf),
            None if !is_missing(&p.country) => Resolution::new(p.country.trim(), conf),
            None if !is_missing(&p.affiliation) => {
                self.resolve_country(&p.affiliation).0.capped(conf)
            }
            None => Resolution::unknown(),
        }
    }
}

/// The `XX` of an affiliation ending in `(XX)`, two upper-case ASCII letters.
fn trailing_code(affiliation: &str) -> Option<&str> {
    let inner = affiliation.trim_end().strip_suffix(')')?;
    let split = inner.len().checked_sub(2)?;
    let code = inner.get(split..)?;
    let head = &inner[..split];
    let is_code = code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase());
    (is_code && head.ends_with('(')).then_some(code)
}
