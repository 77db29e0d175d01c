use std::collections::BTreeMap;

use qmeta_config::Tables;
use qmeta_core::TalkRecord;

use crate::canonical::canonical_country;
use crate::model::{EditionResult, PipelineInput, PipelineResult, PipelineSummary, RunMeta};
use crate::participants::ParticipantDirectory;
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::resolver::Resolver;
use crate::stats::{self, DroppedCounts};

/// Run the pipeline: filter talk types, resolve affiliations, reconcile
/// across all editions, compute statistics.
pub fn run(
    tables: &Tables,
    participants: Option<&ParticipantDirectory>,
    input: PipelineInput,
    options: &ReconcileOptions,
) -> PipelineResult {
    let mut resolver = Resolver::new(tables);
    if let Some(dir) = participants {
        resolver = resolver.with_participants(dir);
    }

    // Filter + resolve per edition
    let mut years = Vec::with_capacity(input.editions.len());
    let mut sizes = Vec::with_capacity(input.editions.len());
    let mut dropped_per_year = Vec::with_capacity(input.editions.len());
    let mut all: Vec<TalkRecord> = Vec::new();
    let mut resolved_by_rule: BTreeMap<String, usize> = BTreeMap::new();

    for edition in input.editions {
        let mut dropped = DroppedCounts::default();
        let before = all.len();
        for mut record in edition.records {
            if !record.talk_type.is_analyzed() {
                dropped.add(record.talk_type);
                continue;
            }
            if let Some(rule) = resolve_record(&resolver, &mut record) {
                *resolved_by_rule.entry(rule).or_insert(0) += 1;
            }
            all.push(record);
        }
        log::info!(
            "edition {}: {} talks kept, {} flash and {} other dropped",
            edition.year,
            all.len() - before,
            dropped.flash,
            dropped.other
        );
        years.push(edition.year);
        sizes.push(all.len() - before);
        dropped_per_year.push(dropped);
    }

    // Reconcile across editions
    let reconcile_summary = reconcile(&mut all, tables, options);

    // Split back per edition
    let mut total_dropped = DroppedCounts::default();
    let mut editions = Vec::with_capacity(years.len());
    let mut rest = all.into_iter();
    for ((year, size), dropped) in years.into_iter().zip(sizes).zip(dropped_per_year) {
        let records: Vec<TalkRecord> = rest.by_ref().take(size).collect();
        total_dropped.merge(&dropped);
        editions.push(EditionResult { year, stats: stats::compute(&records, dropped), records });
    }

    let totals = stats::compute(editions.iter().flat_map(|e| e.records.iter()), total_dropped);

    PipelineResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            min_fuzzy_name_len: options.min_fuzzy_name_len,
        },
        summary: PipelineSummary {
            editions: editions.len(),
            talks: totals.total_main,
            resolved_by_rule,
            reconcile: reconcile_summary,
            totals,
        },
        editions,
    }
}

/// Canonicalize the upstream country, then fill whichever of institute and
/// country is unknown from the resolver. Returns the rule that filled the
/// country, if any.
fn resolve_record(resolver: &Resolver<'_>, record: &mut TalkRecord) -> Option<String> {
    record.country = canonical_country(resolver.tables(), &record.country);
    if record.is_fully_known() {
        return None;
    }

    let affiliation = record.institute.value().unwrap_or_default().to_string();
    let resolved = resolver.resolve(&affiliation, Some(&record.speaker));

    if !record.institute.is_known() {
        record.institute = resolved.institute;
    }
    if !record.country.is_known() && resolved.country.is_known() {
        record.country = resolved.country;
        return Some(resolved.rule.to_string());
    }
    None
}
