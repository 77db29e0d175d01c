use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Settings or table validation error.
    Validation(String),
    /// The same pattern mapped to two different countries in one table.
    ConflictingRule {
        table: &'static str,
        pattern: String,
        first: String,
        second: String,
    },
    /// Config file could not be read.
    Io { path: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::ConflictingRule { table, pattern, first, second } => write!(
                f,
                "{table} table: pattern '{pattern}' maps to both '{first}' and '{second}'"
            ),
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}
