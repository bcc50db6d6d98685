//! Stable assignment of scribes to lecturers.
//!
//! Scribes rank lecturers, lecturers have quotas and may rank scribes. The
//! [`core::engine::MatchingEngine`] runs scribe-proposing deferred acceptance
//! over a validated [`core::preferences::PreferenceModel`] and returns the
//! scribe-optimal stable [`domain::model::Assignment`].
//!
//! The rest of the crate is the command-line surface: CSV input, TOML/CLI
//! configuration and result rendering, wired together by
//! [`app::pipelines::AssignmentPipeline`] and [`core::runner::AssignmentRunner`].

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::app::pipelines::AssignmentPipeline;
pub use crate::config::{OutputFormat, RunSettings};
pub use crate::core::{
    engine::{MatchOutcome, MatchingEngine},
    preferences::PreferenceModel,
    runner::AssignmentRunner,
    stability::{verify, StabilityReport, StabilityViolation},
};
pub use crate::domain::model::{
    Assignment, LecturerAllocation, LecturerEntry, LecturerPreference, MatchReport, MatchStats,
    PreferenceInput, ScribeEntry, UnderFilled,
};
pub use crate::utils::error::{MatchError, Result};
