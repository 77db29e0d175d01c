use proptest::prelude::*;

use qmeta_config::Tables;
use qmeta_core::{Confidence, Resolution, TalkRecord, TalkType};
use qmeta_recon::engine::run;
use qmeta_recon::model::{Edition, PipelineInput};
use qmeta_recon::{reconcile, MatchRule, Participant, ParticipantDirectory, ReconcileOptions, Resolver};

fn rec(speaker: &str, institute: &str, country: &str) -> TalkRecord {
    TalkRecord::new("2019", TalkType::Parallel, speaker, institute, country)
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn end_to_end_single_edition() {
    let input = PipelineInput {
        editions: vec![Edition {
            year: "2019".into(),
            records: vec![
                rec("A. Lee", "Unknown", "Unknown"),
                rec("A. Lee", "Fermilab", "USA"),
                rec("B. Wu", "CERN (CH)", "Unknown"),
            ],
        }],
    };
    let result = run(&Tables::builtin(), None, input, &ReconcileOptions::default());
    let records = &result.editions[0].records;

    assert_eq!(records[0].institute.value(), Some("Fermilab"));
    assert_eq!(records[0].country.value(), Some("USA"));
    assert_eq!(records[0].country.confidence(), Confidence::Exact);

    assert_eq!(records[1].country.confidence(), Confidence::Source);

    assert_eq!(records[2].institute.value(), Some("CERN (CH)"));
    assert_eq!(records[2].country.value(), Some("Switzerland"));

    let stats = &result.editions[0].stats;
    assert_eq!(stats.total_main, 3);
    assert_eq!(stats.unknown_countries.total, 0);
    assert_eq!(stats.countries["USA"], 2);
    assert_eq!(result.summary.resolved_by_rule["country_code"], 1);
    assert_eq!(result.summary.reconcile.institutes_exact, 1);
    assert_eq!(result.summary.reconcile.unresolved, 0);
}

#[test]
fn end_to_end_with_participants() {
    let participants = ParticipantDirectory::new(
        vec![Participant {
            name: "Ollitrault, Jean-Yves".into(),
            affiliation: "IPhT Saclay".into(),
            country: "FR".into(),
        }],
        5,
    );
    let input = PipelineInput {
        editions: vec![Edition {
            year: "2019".into(),
            records: vec![
                rec("Jean-Yves Ollitrault", "", ""),
                rec("Jean-Yves Ollitrault", "", ""),
            ],
        }],
    };
    let result = run(&Tables::builtin(), Some(&participants), input, &ReconcileOptions::default());
    for r in &result.editions[0].records {
        assert_eq!(r.institute.value(), Some("IPhT Saclay"));
        assert_eq!(r.country.value(), Some("France"));
    }
    assert_eq!(result.summary.resolved_by_rule["participant"], 2);
}

#[test]
fn resolver_explains_rule() {
    let tables = Tables::builtin();
    let resolver = Resolver::new(&tables);
    let a = resolver.resolve("Brookhaven National Laboratory, Upton NY", None);
    assert_eq!(a.rule, MatchRule::Institute);
    assert_eq!(a.matched.as_deref(), Some("Brookhaven"));

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["rule"], "institute");
    assert_eq!(json["country"]["value"], "USA");
    assert_eq!(json["country"]["confidence"], "exact");
}

#[test]
fn pipeline_summary_serializes() {
    let input = PipelineInput {
        editions: vec![Edition { year: "2023".into(), records: vec![rec("X Y", "KEK", "")] }],
    };
    let result = run(&Tables::builtin(), None, input, &ReconcileOptions::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["summary"]["editions"], 1);
    assert_eq!(json["editions"][0]["year"], "2023");
    assert_eq!(json["editions"][0]["stats"]["countries"]["Japan"], 1);
    assert!(json["editions"][0].get("records").is_none());
    assert!(json["meta"]["run_at"].is_string());
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

const SPEAKERS: &[&str] = &[
    "J. Smith",
    "Dr. J. Smith",
    "Smith, J.",
    "Al Pacino",
    "Pacin",
    "A. Lee",
    "Karsch, Frithjof",
    "Frithjof Karsch",
    "",
];
const INSTITUTES: &[&str] = &["", "MIT", "CERN", "JYFL", "Bielefeld University", "Somewhere"];
const COUNTRIES: &[&str] = &["", "USA", "Switzerland", "Germany", "Finland", "Atlantis"];

fn arb_record() -> impl Strategy<Value = TalkRecord> {
    (
        prop::sample::select(SPEAKERS),
        prop::sample::select(INSTITUTES),
        prop::sample::select(COUNTRIES),
        prop::bool::ANY,
    )
        .prop_map(|(s, i, c, fallback)| {
            let mut r = rec(s, i, c);
            if fallback && r.country.is_known() {
                r.country = Resolution::fallback(c);
            }
            r
        })
}

proptest! {
    #[test]
    fn reconcile_is_monotone(mut records in prop::collection::vec(arb_record(), 0..24)) {
        let before = records.clone();
        reconcile(&mut records, &Tables::builtin(), &ReconcileOptions::default());
        for (b, a) in before.iter().zip(&records) {
            if b.institute.is_known() {
                prop_assert_eq!(&b.institute, &a.institute);
            }
            if b.country.is_known() {
                prop_assert_eq!(&b.country, &a.country);
            }
            prop_assert!(a.country.confidence() <= b.country.confidence().max(Confidence::Exact));
        }
    }

    #[test]
    fn reconcile_is_idempotent(mut records in prop::collection::vec(arb_record(), 0..24)) {
        let tables = Tables::builtin();
        let options = ReconcileOptions::default();
        reconcile(&mut records, &tables, &options);
        let once = records.clone();
        let second = reconcile(&mut records, &tables, &options);
        prop_assert_eq!(&once, &records);
        prop_assert_eq!(second.filled(), 0);
    }

    #[test]
    fn trailing_code_wins(prefix in "[A-Za-z ,.]{0,24}", idx in 0usize..39) {
        let tables = Tables::builtin();
        let codes = tables.country_codes();
        let code = &codes[idx % codes.len()];
        let aff = format!("{prefix} ({})", code.code);
        let a = Resolver::new(&tables).resolve(&aff, None);
        prop_assert_eq!(a.country.value(), Some(code.country.as_str()));
        prop_assert_eq!(a.rule, MatchRule::CountryCode);
    }

    #[test]
    fn institute_substring_wins_without_earlier_rule(
        prefix in "[a-z ]{0,12}",
        suffix in "[a-z ]{0,12}",
    ) {
        let tables = Tables::builtin();
        let aff = format!("{prefix}DESY{suffix}");
        let a = Resolver::new(&tables).resolve(&aff, None);
        prop_assert_eq!(a.rule, MatchRule::Institute);
        prop_assert!(a.country.is_known());
    }
}
