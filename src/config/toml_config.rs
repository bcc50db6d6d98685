use crate::config::OutputFormat;
use crate::domain::model::QuotaEntry;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: Option<InputConfig>,
    /// lecturer 名稱 -> quota
    pub quotas: Option<BTreeMap<String, i64>>,
    pub defaults: Option<DefaultsConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub scribe_preferences: Option<String>,
    pub lecturer_preferences: Option<String>,
    pub lecturer_quotas: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub missing_quota: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，找不到的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(input) = &self.input {
            let paths = [
                ("input.scribe_preferences", &input.scribe_preferences),
                ("input.lecturer_preferences", &input.lecturer_preferences),
                ("input.lecturer_quotas", &input.lecturer_quotas),
            ];
            for (field, path) in paths {
                if let Some(path) = path {
                    validate_path(field, path)?;
                }
            }
        }

        if let Some(missing_quota) = self.defaults.as_ref().and_then(|d| d.missing_quota) {
            validate_positive_number("defaults.missing_quota", missing_quota, 1)?;
        }

        if let Some(path) = self.output.as_ref().and_then(|o| o.path.as_ref()) {
            validate_path("output.path", path)?;
        }

        Ok(())
    }

    pub fn scribe_preferences(&self) -> Option<&str> {
        self.input.as_ref()?.scribe_preferences.as_deref()
    }

    pub fn lecturer_preferences(&self) -> Option<&str> {
        self.input.as_ref()?.lecturer_preferences.as_deref()
    }

    pub fn lecturer_quotas(&self) -> Option<&str> {
        self.input.as_ref()?.lecturer_quotas.as_deref()
    }

    /// 依名稱排序；quota 正負由 PreferenceModel 驗證
    pub fn inline_quotas(&self) -> Vec<QuotaEntry> {
        self.quotas
            .iter()
            .flatten()
            .map(|(lecturer, &quota)| QuotaEntry {
                lecturer: lecturer.clone(),
                quota,
            })
            .collect()
    }

    pub fn missing_quota(&self) -> Option<usize> {
        self.defaults.as_ref()?.missing_quota
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.as_ref()?.format
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref()?.path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[input]
scribe_preferences = "scribes.csv"
lecturer_preferences = "lecturers.csv"

[quotas]
Prof_B = 2
Prof_A = 1

[defaults]
missing_quota = 3

[output]
format = "json"
path = "out/assignment.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.scribe_preferences(), Some("scribes.csv"));
        assert_eq!(config.lecturer_preferences(), Some("lecturers.csv"));
        assert_eq!(config.lecturer_quotas(), None);
        assert_eq!(config.missing_quota(), Some(3));
        assert_eq!(config.output_format(), Some(OutputFormat::Json));
        assert_eq!(config.output_path(), Some("out/assignment.json"));
        assert_eq!(
            config.inline_quotas(),
            vec![
                QuotaEntry { lecturer: "Prof_A".to_string(), quota: 1 },
                QuotaEntry { lecturer: "Prof_B".to_string(), quota: 2 },
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.scribe_preferences().is_none());
        assert!(config.inline_quotas().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCRIBE_MATCH_TEST_DIR", "/data/term1");

        let toml_content = r#"
[input]
scribe_preferences = "${SCRIBE_MATCH_TEST_DIR}/scribes.csv"
lecturer_quotas = "${SCRIBE_MATCH_TEST_UNSET}/quotas.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.scribe_preferences(), Some("/data/term1/scribes.csv"));
        assert_eq!(config.lecturer_quotas(), Some("${SCRIBE_MATCH_TEST_UNSET}/quotas.csv"));

        std::env::remove_var("SCRIBE_MATCH_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[defaults]\nmissing_quota = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[output]\npath = \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_format_is_a_parse_error() {
        let err = TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, MatchError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[input]\nscribe_preferences = \"from-file.csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.scribe_preferences(), Some("from-file.csv"));
    }
}
