use qmeta_config::Tables;
use qmeta_core::Resolution;

/// Rewrite a known country to its canonical name ("DE", "Deutschland" ->
/// "Germany"), keeping its confidence. Unrecognized values are returned
/// unchanged.
pub fn canonical_country(tables: &Tables, country: &Resolution) -> Resolution {
    match country.value().and_then(|v| tables.canonical_country(v)) {
        Some(name) if Some(name) != country.value() => Resolution::new(name, country.confidence()),
        _ => country.clone(),
    }
}
