use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum IoError {
    /// File or directory could not be read.
    Read { path: String, message: String },
    /// File contents could not be parsed.
    Parse { path: String, message: String },
    /// A required column is absent from a CSV header.
    MissingColumn { path: String, column: String },
    /// Output could not be written.
    Write { path: String, message: String },
}

impl IoError {
    pub fn read(path: &Path, e: impl fmt::Display) -> Self {
        Self::Read { path: path.display().to_string(), message: e.to_string() }
    }

    pub fn parse(path: &Path, e: impl fmt::Display) -> Self {
        Self::Parse { path: path.display().to_string(), message: e.to_string() }
    }

    pub fn write(path: &Path, e: impl fmt::Display) -> Self {
        Self::Write { path: path.display().to_string(), message: e.to_string() }
    }

    /// True for errors on the output side.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Parse { path, message } => write!(f, "cannot parse {path}: {message}"),
            Self::MissingColumn { path, column } => {
                write!(f, "{path}: missing column '{column}'")
            }
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
        }
    }
}

impl std::error::Error for IoError {}
