//! `qmeta-recon`: affiliation resolution and cross-edition reconciliation.
//!
//! Pure engine crate: receives loaded records and lookup tables, returns
//! cleaned records plus statistics. No CLI or IO dependencies.

pub mod canonical;
pub mod engine;
pub mod model;
pub mod participants;
pub mod reconcile;
pub mod resolver;
pub mod stats;

pub use engine::run;
pub use model::{Affiliation, Edition, MatchRule, PipelineInput, PipelineResult, ReconcileSummary};
pub use participants::{Participant, ParticipantDirectory};
pub use reconcile::{reconcile, ReconcileOptions};
pub use resolver::Resolver;
