use crate::config::toml_config::TomlConfig;
use crate::config::{OutputFormat, RunSettings, DEFAULT_MISSING_QUOTA};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "assign-scribes")]
#[command(about = "Assign scribes to lecturers using stable matching")]
#[command(after_help = "Required CSV formats:\n  \
    scribe_preferences.csv:   scribe_name,1st_choice,2nd_choice,...\n  \
    lecturer_quotas.csv:      lecturer_name,quota\n  \
    lecturer_preferences.csv: lecturer_name,1st_choice,2nd_choice,...")]
pub struct CliConfig {
    /// CSV file with scribe preferences
    pub scribe_preferences: Option<String>,

    /// CSV file with lecturer preferences (optional)
    #[arg(short = 'p', long)]
    pub lecturer_preferences: Option<String>,

    /// CSV file with lecturer quotas (optional; prompts when absent)
    #[arg(short = 'q', long)]
    pub lecturer_quotas: Option<String>,

    /// TOML run configuration
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Quota given to lecturers that scribes rank but no quota source lists
    #[arg(long)]
    pub default_quota: Option<usize>,

    #[arg(long, help = "Only show final results")]
    pub quiet: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 讀取設定檔（若有），再以命令列參數覆蓋
    pub fn resolve(&self) -> Result<RunSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };

        let scribe_preferences = self
            .scribe_preferences
            .clone()
            .or_else(|| file.scribe_preferences().map(str::to_string));
        let scribe_preferences = validate_required_field("scribe_preferences", &scribe_preferences)?;

        let settings = RunSettings {
            scribe_preferences: scribe_preferences.clone(),
            lecturer_preferences: self
                .lecturer_preferences
                .clone()
                .or_else(|| file.lecturer_preferences().map(str::to_string)),
            lecturer_quotas: self
                .lecturer_quotas
                .clone()
                .or_else(|| file.lecturer_quotas().map(str::to_string)),
            quotas: file.inline_quotas(),
            default_quota: self
                .default_quota
                .or_else(|| file.missing_quota())
                .unwrap_or(DEFAULT_MISSING_QUOTA),
            output_format: self.format.or_else(|| file.output_format()).unwrap_or_default(),
            output_path: self
                .output
                .clone()
                .or_else(|| file.output_path().map(str::to_string)),
        };

        settings.validate()?;
        Ok(settings)
    }
}
