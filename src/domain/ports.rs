use crate::config::OutputFormat;
use crate::domain::model::{MatchReport, PreferenceInput, QuotaEntry};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn scribe_preferences(&self) -> &str;
    fn lecturer_preferences(&self) -> Option<&str>;
    fn lecturer_quotas(&self) -> Option<&str>;
    /// 設定檔內直接寫的 quota，沒有 quota 檔時使用
    fn inline_quotas(&self) -> Vec<QuotaEntry>;
    fn default_quota(&self) -> usize;
    fn output_format(&self) -> OutputFormat;
    fn output_path(&self) -> Option<&str>;
}

/// extract → transform → load
pub trait Pipeline {
    fn extract(&mut self) -> Result<PreferenceInput>;
    fn transform(&self, input: PreferenceInput) -> Result<MatchReport>;
    fn load(&self, report: MatchReport) -> Result<String>;
}
