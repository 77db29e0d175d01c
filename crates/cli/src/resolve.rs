// qmeta resolve / qmeta tables - inspect single resolutions and the
// effective lookup tables

use std::path::Path;

use serde::Serialize;

use qmeta_recon::{Affiliation, Resolver};

use crate::pipeline::{self, Overrides};
use crate::{print_json, CliError, InputArgs};

#[derive(Serialize)]
struct ResolveOutput<'a> {
    affiliation: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker: Option<&'a str>,
    #[serde(flatten)]
    result: &'a Affiliation,
}

pub fn cmd_resolve(
    config: Option<&Path>,
    inputs: InputArgs,
    affiliation: &str,
    speaker: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    if affiliation.trim().is_empty() && speaker.is_none() {
        return Err(CliError::usage("affiliation is empty")
            .with_hint("pass --speaker to look the speaker up in the participants list"));
    }

    let settings = pipeline::load_settings(config, Overrides::from_inputs(inputs))?;
    let tables = pipeline::load_tables(&settings)?;
    let participants = pipeline::load_participants(&settings)?;

    let mut resolver = Resolver::new(&tables);
    if let Some(dir) = participants.as_ref() {
        resolver = resolver.with_participants(dir);
    }
    let result = resolver.resolve(affiliation, speaker);

    if json {
        return print_json(&ResolveOutput { affiliation, speaker, result: &result });
    }

    println!("affiliation: {affiliation}");
    if let Some(s) = speaker {
        println!("speaker:     {s}");
    }
    println!("institute:   {} ({})", result.institute.display(), result.institute.confidence());
    println!("country:     {} ({})", result.country.display(), result.country.confidence());
    match &result.matched {
        Some(m) => println!("rule:        {} [{m}]", result.rule),
        None => println!("rule:        {}", result.rule),
    }
    Ok(())
}

pub fn cmd_tables(config: Option<&Path>, inputs: InputArgs, json: bool) -> Result<(), CliError> {
    let settings = pipeline::load_settings(config, Overrides::from_inputs(inputs))?;
    let tables = pipeline::load_tables(&settings)?;

    if json {
        return print_json(&tables);
    }

    let keywords: usize = tables.countries().iter().map(|c| c.keywords.len()).sum();
    let aliases: usize = tables.countries().iter().map(|c| c.aliases.len()).sum();
    println!("country codes: {}", tables.country_codes().len());
    println!("countries:     {} ({} aliases, {} keywords)", tables.countries().len(), aliases, keywords);
    println!("institutes:    {}", tables.institutes().len());
    println!("fixups:        {}", tables.fixups().len());
    if !settings.mapping_files.is_empty() {
        let files: Vec<String> =
            settings.mapping_files.iter().map(|p| p.display().to_string()).collect();
        println!("mapping files: {}", files.join(", "));
    }
    Ok(())
}
