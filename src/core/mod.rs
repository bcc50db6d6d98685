pub mod engine;
pub mod preferences;
pub mod runner;
pub mod stability;

pub use crate::domain::model::{Assignment, MatchReport, PreferenceInput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
