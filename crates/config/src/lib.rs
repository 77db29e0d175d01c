// Configuration loading

mod builtin;
pub mod error;
pub mod settings;
pub mod tables;

pub use error::ConfigError;
pub use settings::{ReconcileSettings, Settings, TableOverrides};
pub use tables::{CountryEntry, InstituteRule, Tables};
