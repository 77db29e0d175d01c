//! CLI Exit Code Registry
//!
//! Single source of truth for `qmeta` exit codes. Scripts that drive the
//! pipeline rely on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success                                                    |
//! | 1    | General error (unspecified)                                |
//! | 2    | Usage error (bad arguments; also clap's own parse errors)  |
//! | 3    | Configuration error (settings file, conflicting rules)     |
//! | 4    | Input error (malformed staged data, mapping or participants) |
//! | 5    | Output error (processed files could not be written)        |
//!
//! Missing optional files (mapping tables, participants list, single
//! editions) are warnings, not errors, and never change the exit code.

use qmeta_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Settings file unreadable or invalid, or table rules conflict.
pub const EXIT_CONFIG: u8 = 3;

/// Staged talk data, mapping files or participants list unreadable or
/// malformed, or no edition could be loaded.
pub const EXIT_INPUT: u8 = 4;

/// Processed output could not be written.
pub const EXIT_OUTPUT: u8 = 5;

pub fn io_exit_code(err: &IoError) -> u8 {
    if err.is_write() {
        EXIT_OUTPUT
    } else {
        EXIT_INPUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_CONFIG, EXIT_INPUT, EXIT_OUTPUT];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn io_errors_split_by_direction() {
        let read = IoError::Read { path: "a".into(), message: "gone".into() };
        let write = IoError::Write { path: "b".into(), message: "full".into() };
        assert_eq!(io_exit_code(&read), EXIT_INPUT);
        assert_eq!(io_exit_code(&write), EXIT_OUTPUT);
    }
}
