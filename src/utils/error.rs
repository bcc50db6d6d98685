use crate::core::preferences::ValidationIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid preference input ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
    InvalidPreferences { issues: Vec<ValidationIssue> },

    #[error("No valid scribe preferences found in {path}")]
    NoScribes { path: String },

    #[error("No lecturer quotas provided")]
    NoQuotas,
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl MatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::IoError(_) => ErrorCategory::Io,
            MatchError::SerializationError(_) => ErrorCategory::Output,
            MatchError::MissingConfigError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            MatchError::CsvError(_)
            | MatchError::InvalidPreferences { .. }
            | MatchError::NoScribes { .. }
            | MatchError::NoQuotas => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 檔案暫時無法讀寫，重試可能成功
            MatchError::IoError(_) => ErrorSeverity::Medium,
            MatchError::SerializationError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MatchError::CsvError(_) => {
                "Check that the CSV file is well-formed (name,choice1,choice2,...)".to_string()
            }
            MatchError::IoError(_) => {
                "Check that the file exists and that you have permission to read/write it"
                    .to_string()
            }
            MatchError::SerializationError(_) => {
                "This is an internal error; please report it with your input files".to_string()
            }
            MatchError::ConfigValidationError { .. } => {
                "Review the TOML configuration file for syntax or missing sections".to_string()
            }
            MatchError::MissingConfigError { field } => {
                format!("Provide a value for '{}' on the command line or in the config file", field)
            }
            MatchError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and try again", field)
            }
            MatchError::InvalidPreferences { .. } => {
                "Make every name unique, remove repeated entries, reference only known scribes/lecturers and use quotas of at least 1".to_string()
            }
            MatchError::NoScribes { .. } => {
                "Add at least one scribe row below the header row".to_string()
            }
            MatchError::NoQuotas => {
                "Pass --lecturer-quotas, add a [quotas] table to the config, or enter 'lecturer_name:quota' lines".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MatchError::InvalidPreferences { issues } => {
                let mut message = format!("Input validation failed with {} issue(s):", issues.len());
                for issue in issues {
                    message.push_str("\n  - ");
                    message.push_str(&issue.message);
                }
                message
            }
            MatchError::IoError(e) => format!("Error: File not found or unreadable - {}", e),
            other => format!("Error: {}", other),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}
