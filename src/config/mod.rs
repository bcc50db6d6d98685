#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::ConfigProvider;
use crate::domain::model::QuotaEntry;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MISSING_QUOTA: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// 合併 CLI 與設定檔後的最終執行設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub scribe_preferences: String,
    pub lecturer_preferences: Option<String>,
    pub lecturer_quotas: Option<String>,
    pub quotas: Vec<QuotaEntry>,
    pub default_quota: usize,
    pub output_format: OutputFormat,
    pub output_path: Option<String>,
}

impl RunSettings {
    pub fn new(scribe_preferences: impl Into<String>) -> Self {
        Self {
            scribe_preferences: scribe_preferences.into(),
            lecturer_preferences: None,
            lecturer_quotas: None,
            quotas: Vec::new(),
            default_quota: DEFAULT_MISSING_QUOTA,
            output_format: OutputFormat::default(),
            output_path: None,
        }
    }
}

impl ConfigProvider for RunSettings {
    fn scribe_preferences(&self) -> &str {
        &self.scribe_preferences
    }

    fn lecturer_preferences(&self) -> Option<&str> {
        self.lecturer_preferences.as_deref()
    }

    fn lecturer_quotas(&self) -> Option<&str> {
        self.lecturer_quotas.as_deref()
    }

    fn inline_quotas(&self) -> Vec<QuotaEntry> {
        self.quotas.clone()
    }

    fn default_quota(&self) -> usize {
        self.default_quota
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validate_path("scribe_preferences", &self.scribe_preferences)?;
        validate_file_extension("scribe_preferences", &self.scribe_preferences, &["csv"])?;

        if let Some(path) = &self.lecturer_preferences {
            validate_path("lecturer_preferences", path)?;
            validate_file_extension("lecturer_preferences", path, &["csv"])?;
        }

        if let Some(path) = &self.lecturer_quotas {
            validate_path("lecturer_quotas", path)?;
            validate_file_extension("lecturer_quotas", path, &["csv"])?;
        }

        for entry in &self.quotas {
            validate_non_empty_string("quotas", &entry.lecturer)?;
        }

        validate_positive_number("default_quota", self.default_quota, 1)?;

        if let Some(path) = &self.output_path {
            validate_path("output", path)?;
        }

        Ok(())
    }
}
