use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Table entries
// ---------------------------------------------------------------------------

/// A (pattern, country) rule. `pattern` matches as a case-insensitive
/// substring of an affiliation or institute string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstituteRule {
    pub pattern: String,
    pub country: String,
}

impl InstituteRule {
    pub fn new(pattern: impl Into<String>, country: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), country: country.into() }
    }

    fn matches_lower(&self, haystack_lower: &str) -> bool {
        let needle = self.pattern.to_lowercase();
        !needle.is_empty() && haystack_lower.contains(&needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCode {
    pub code: String,
    pub country: String,
}

/// One canonical country of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryEntry {
    pub name: String,
    /// Other spellings of the country itself.
    pub aliases: Vec<String>,
    /// Places and institutions that imply the country.
    pub keywords: Vec<String>,
}

impl CountryEntry {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), aliases: Vec::new(), keywords: Vec::new() }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Immutable lookup data shared by the resolver and reconciliation.
///
/// Every list is ordered and scanned first-match-wins. Extra rules from
/// mapping files and the settings file are placed in front of the built-in
/// ones and replace built-in rules with the same pattern.
#[derive(Debug, Clone, Serialize)]
pub struct Tables {
    country_codes: Vec<CountryCode>,
    countries: Vec<CountryEntry>,
    institutes: Vec<InstituteRule>,
    fixups: Vec<InstituteRule>,
}

impl Default for Tables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Tables {
    /// The compiled-in tables.
    pub fn builtin() -> Self {
        let to_strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let to_rules = |xs: &[(&str, &str)]| {
            xs.iter().map(|(p, c)| InstituteRule::new(*p, *c)).collect::<Vec<_>>()
        };
        Self {
            country_codes: builtin::COUNTRY_CODES
                .iter()
                .map(|(code, country)| CountryCode {
                    code: code.to_string(),
                    country: country.to_string(),
                })
                .collect(),
            countries: builtin::COUNTRIES
                .iter()
                .map(|(name, aliases, keywords)| CountryEntry {
                    name: name.to_string(),
                    aliases: to_strings(*aliases),
                    keywords: to_strings(*keywords),
                })
                .collect(),
            institutes: to_rules(builtin::INSTITUTES),
            fixups: to_rules(builtin::FIXUPS),
        }
    }

    pub fn country_codes(&self) -> &[CountryCode] {
        &self.country_codes
    }

    pub fn countries(&self) -> &[CountryEntry] {
        &self.countries
    }

    pub fn institutes(&self) -> &[InstituteRule] {
        &self.institutes
    }

    pub fn fixups(&self) -> &[InstituteRule] {
        &self.fixups
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Country for a two-letter marker. Case-sensitive: markers are written
    /// in upper case.
    pub fn country_for_code(&self, code: &str) -> Option<&str> {
        self.country_codes.iter().find(|c| c.code == code).map(|c| c.country.as_str())
    }

    /// Canonical name when `value` equals a country name or alias
    /// (case-insensitive).
    pub fn country_for_name(&self, value: &str) -> Option<&str> {
        let value = value.trim();
        self.countries
            .iter()
            .find(|c| c.names().any(|n| eq_lower(n, value)))
            .map(|c| c.name.as_str())
    }

    /// Canonical name when `segment` equals a country name, alias or
    /// keyword (case-insensitive).
    pub fn country_for_segment(&self, segment: &str) -> Option<&str> {
        let segment = segment.trim();
        if segment.is_empty() {
            return None;
        }
        self.countries
            .iter()
            .find(|c| {
                c.names().chain(c.keywords.iter().map(String::as_str)).any(|n| eq_lower(n, segment))
            })
            .map(|c| c.name.as_str())
    }

    /// Canonical form of an upstream country value: a two-letter code, a
    /// name or an alias. `None` when unrecognized.
    pub fn canonical_country(&self, value: &str) -> Option<&str> {
        let value = value.trim();
        if value.len() == 2 {
            if let Some(c) = self.country_for_code(&value.to_ascii_uppercase()) {
                return Some(c);
            }
        }
        self.country_for_name(value)
    }

    pub fn is_canonical(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c.name == country)
    }

    /// First institute rule whose pattern occurs in `affiliation`.
    pub fn match_institute(&self, affiliation: &str) -> Option<&InstituteRule> {
        let lower = affiliation.to_lowercase();
        self.institutes.iter().find(|r| r.matches_lower(&lower))
    }

    /// First country with a name, alias or keyword occurring in
    /// `affiliation` as a case-insensitive substring, and the term that
    /// matched. Countries are scanned in table order.
    pub fn match_keyword(&self, affiliation: &str) -> Option<(&str, &str)> {
        let lower = affiliation.to_lowercase();
        self.countries.iter().find_map(|c| {
            c.names()
                .chain(c.keywords.iter().map(String::as_str))
                .find(|term| contains_lower(&lower, term))
                .map(|term| (c.name.as_str(), term))
        })
    }

    /// First fixup rule whose pattern occurs in `institute`.
    pub fn match_fixup(&self, institute: &str) -> Option<&InstituteRule> {
        let lower = institute.to_lowercase();
        self.fixups.iter().find(|r| r.matches_lower(&lower))
    }

    // -----------------------------------------------------------------------
    // Extension
    // -----------------------------------------------------------------------

    /// Put `rules` in front of the institute table.
    pub fn with_institutes(mut self, rules: Vec<InstituteRule>) -> Result<Self, ConfigError> {
        let rules = self.prepare_rules("institute", rules)?;
        self.institutes = prepend(rules, std::mem::take(&mut self.institutes));
        Ok(self)
    }

    /// Put `rules` in front of the fixup table.
    pub fn with_fixups(mut self, rules: Vec<InstituteRule>) -> Result<Self, ConfigError> {
        let rules = self.prepare_rules("fixup", rules)?;
        self.fixups = prepend(rules, std::mem::take(&mut self.fixups));
        Ok(self)
    }

    /// Add or replace two-letter country markers.
    pub fn with_country_codes<I>(mut self, codes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut incoming: Vec<CountryCode> = Vec::new();
        for (code, country) in codes {
            let code = code.trim().to_ascii_uppercase();
            if !is_country_code(&code) {
                return Err(ConfigError::Validation(format!(
                    "country code '{code}' must be two ASCII letters"
                )));
            }
            let Some(country) = self.intern_country(&country) else {
                log::debug!("skipping country code {code} with no country");
                continue;
            };
            if let Some(prev) = incoming.iter().find(|c| c.code == code) {
                if prev.country != country {
                    return Err(ConfigError::ConflictingRule {
                        table: "country code",
                        pattern: code,
                        first: prev.country.clone(),
                        second: country,
                    });
                }
                continue;
            }
            incoming.push(CountryCode { code, country });
        }
        self.country_codes.retain(|c| !incoming.iter().any(|i| i.code == c.code));
        incoming.append(&mut self.country_codes);
        self.country_codes = incoming;
        Ok(self)
    }

    /// Trim, canonicalize and dedupe incoming rules. Rules naming no country
    /// are dropped; a pattern mapped to two countries is an error.
    fn prepare_rules(
        &mut self,
        table: &'static str,
        rules: Vec<InstituteRule>,
    ) -> Result<Vec<InstituteRule>, ConfigError> {
        let mut out: Vec<InstituteRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            let pattern = rule.pattern.trim().to_string();
            if pattern.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{table} rule with empty pattern (country '{}')",
                    rule.country
                )));
            }
            let Some(country) = self.intern_country(&rule.country) else {
                log::debug!("skipping {table} rule '{pattern}' with no country");
                continue;
            };
            if let Some(prev) = out.iter().find(|r| eq_lower(&r.pattern, &pattern)) {
                if prev.country != country {
                    return Err(ConfigError::ConflictingRule {
                        table,
                        pattern,
                        first: prev.country.clone(),
                        second: country,
                    });
                }
                continue;
            }
            out.push(InstituteRule { pattern, country });
        }
        Ok(out)
    }

    /// Canonical name for `country`, adding it to the vocabulary when new.
    /// `None` for empty and sentinel values.
    fn intern_country(&mut self, country: &str) -> Option<String> {
        let country = country.trim();
        if country.is_empty() || country.eq_ignore_ascii_case("unknown") {
            return None;
        }
        if let Some(c) = self.canonical_country(country) {
            return Some(c.to_string());
        }
        log::debug!("adding '{country}' to the country vocabulary");
        self.countries.push(CountryEntry::new(country));
        Some(country.to_string())
    }

    // -----------------------------------------------------------------------
    // Validate
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names: HashMap<String, &str> = HashMap::new();
        for entry in &self.countries {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Validation("country with empty name".into()));
            }
            for n in entry.names() {
                if let Some(prev) = names.insert(n.to_lowercase(), &entry.name) {
                    if prev != entry.name {
                        return Err(ConfigError::ConflictingRule {
                            table: "country",
                            pattern: n.to_string(),
                            first: prev.to_string(),
                            second: entry.name.clone(),
                        });
                    }
                }
            }
        }

        let mut codes: HashMap<&str, &str> = HashMap::new();
        for c in &self.country_codes {
            if !is_country_code(&c.code) || c.code != c.code.to_ascii_uppercase() {
                return Err(ConfigError::Validation(format!(
                    "country code '{}' must be two upper-case ASCII letters",
                    c.code
                )));
            }
            self.check_known("country code", &c.code, &c.country)?;
            if let Some(prev) = codes.insert(&c.code, &c.country) {
                if prev != c.country {
                    return Err(ConfigError::ConflictingRule {
                        table: "country code",
                        pattern: c.code.clone(),
                        first: prev.to_string(),
                        second: c.country.clone(),
                    });
                }
            }
        }

        self.validate_rules("institute", &self.institutes)?;
        self.validate_rules("fixup", &self.fixups)
    }

    fn validate_rules(&self, table: &'static str, rules: &[InstituteRule]) -> Result<(), ConfigError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for rule in rules {
            if rule.pattern.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{table} rule with empty pattern")));
            }
            self.check_known(table, &rule.pattern, &rule.country)?;
            if let Some(prev) = seen.insert(rule.pattern.to_lowercase(), &rule.country) {
                if prev != rule.country {
                    return Err(ConfigError::ConflictingRule {
                        table,
                        pattern: rule.pattern.clone(),
                        first: prev.to_string(),
                        second: rule.country.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_known(&self, table: &str, pattern: &str, country: &str) -> Result<(), ConfigError> {
        if self.is_canonical(country) {
            Ok(())
        } else {
            Err(ConfigError::Validation(format!(
                "{table} '{pattern}' maps to '{country}', which is not a known country"
            )))
        }
    }
}

fn prepend(mut front: Vec<InstituteRule>, mut back: Vec<InstituteRule>) -> Vec<InstituteRule> {
    back.retain(|b| !front.iter().any(|f| eq_lower(&f.pattern, &b.pattern)));
    front.append(&mut back);
    front
}

/// Case-insensitive containment of `term` in an already lower-cased
/// haystack.
fn contains_lower(haystack_lower: &str, term: &str) -> bool {
    let needle = term.to_lowercase();
    !needle.is_empty() && haystack_lower.contains(&needle)
}

fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn eq_lower(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
