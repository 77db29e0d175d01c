//! `qmeta-core`: shared types for the affiliation pipeline.
//!
//! No IO and no lookup tables live here; the other crates depend on these
//! types to pass records between the loader, the engine and the exporters.

pub mod names;
pub mod resolution;
pub mod talk;

pub use resolution::{Confidence, Resolution, SENTINEL};
pub use talk::{TalkRecord, TalkType};
