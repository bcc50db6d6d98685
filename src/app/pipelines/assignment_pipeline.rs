use crate::adapters::{csv_input, quota_prompt, report};
use crate::core::engine::MatchingEngine;
use crate::core::preferences::{PreferenceModel, ValidationIssue, ValidationIssueKind};
use crate::core::stability;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    LecturerEntry, LecturerPreference, MatchReport, PreferenceInput, QuotaEntry, RankedRow,
    ScribeEntry,
};
use crate::utils::error::{MatchError, Result};
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Write};

/// CSV 檔 → stable matching → table/json/csv 輸出
pub struct AssignmentPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    quota_input: Box<dyn BufRead>,
    prompt_output: Box<dyn Write>,
}

impl<S: Storage, C: ConfigProvider> AssignmentPipeline<S, C> {
    /// Interactive quota entry reads stdin and prompts on stderr.
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            quota_input: Box::new(BufReader::new(std::io::stdin())),
            prompt_output: Box::new(std::io::stderr()),
        }
    }

    pub fn with_quota_input(
        mut self,
        input: impl BufRead + 'static,
        output: impl Write + 'static,
    ) -> Self {
        self.quota_input = Box::new(input);
        self.prompt_output = Box::new(output);
        self
    }

    fn load_quotas(&mut self) -> Result<Vec<QuotaEntry>> {
        if let Some(path) = self.config.lecturer_quotas() {
            tracing::info!("📊 Loading lecturer quotas from {}", path);
            let data = self.storage.read_file(path)?;
            return csv_input::read_lecturer_quotas(data.as_slice());
        }

        let inline = self.config.inline_quotas();
        if !inline.is_empty() {
            tracing::info!("📊 Using {} quotas from the configuration file", inline.len());
            return Ok(inline);
        }

        tracing::info!("⌨️ No lecturer quotas file provided. Getting quotas via user input...");
        quota_prompt::prompt_quotas(&mut self.quota_input, &mut self.prompt_output)
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for AssignmentPipeline<S, C> {
    fn extract(&mut self) -> Result<PreferenceInput> {
        let path = self.config.scribe_preferences().to_string();
        tracing::info!("📋 Loading scribe preferences from {}", path);
        let data = self.storage.read_file(&path)?;
        let scribes = csv_input::read_scribe_preferences(data.as_slice())?;
        if scribes.is_empty() {
            return Err(MatchError::NoScribes { path });
        }
        tracing::info!("✅ Loaded preferences for {} scribes", scribes.len());

        let quotas = self.load_quotas()?;
        if quotas.is_empty() {
            return Err(MatchError::NoQuotas);
        }

        let rankings = match self.config.lecturer_preferences() {
            Some(path) => {
                tracing::info!("👥 Loading lecturer preferences from {}", path);
                let data = self.storage.read_file(path)?;
                Some(csv_input::read_lecturer_preferences(data.as_slice())?)
            }
            None => {
                tracing::info!(
                    "🎲 No lecturer preferences file provided. Ranking applicants by input order..."
                );
                None
            }
        };

        assemble_input(scribes, quotas, rankings, self.config.default_quota())
    }

    fn transform(&self, input: PreferenceInput) -> Result<MatchReport> {
        let model = PreferenceModel::build(&input)?;
        tracing::debug!(
            "Preference model built: {} scribes, {} lecturers, {} ranked choices",
            model.scribe_names().len(),
            model.lecturer_names().len(),
            model.total_preference_length()
        );

        let outcome = MatchingEngine::new().run(&model);

        let check = stability::verify(&model, &outcome.assignment);
        if check.is_stable() {
            tracing::debug!("Stability check passed");
        } else {
            for violation in &check.violations {
                tracing::error!("❌ Stability violation: {}", violation);
            }
        }

        Ok(MatchReport {
            scribes: model.scribe_names().to_vec(),
            under_filled: outcome.assignment.under_filled(),
            assignment: outcome.assignment,
            stats: outcome.stats,
            stable: check.is_stable(),
            violations: check.violations.iter().map(ToString::to_string).collect(),
        })
    }

    fn load(&self, report: MatchReport) -> Result<String> {
        let rendered = report::render(&report, self.config.output_format())?;

        match self.config.output_path() {
            Some(path) => {
                tracing::debug!(
                    "Writing {} output ({} bytes) to storage",
                    self.config.output_format(),
                    rendered.len()
                );
                self.storage.write_file(path, rendered.as_bytes())?;
                tracing::info!("📁 Results saved to: {}", path);
                Ok(path.to_string())
            }
            None => {
                print!("{}", rendered);
                Ok("stdout".to_string())
            }
        }
    }
}

/// Builds the core input from the loaded files.
///
/// The lecturer set is the quota table in order, followed by lecturers that
/// scribes rank but the quota table omits (given `default_quota`, in order of
/// first mention). Lecturers without a ranking row, or whose row lists no
/// scribes, use input order. Ranking rows for lecturers outside that set, or
/// repeated rows, are rejected.
pub fn assemble_input(
    scribes: Vec<ScribeEntry>,
    quotas: Vec<QuotaEntry>,
    rankings: Option<Vec<RankedRow>>,
    default_quota: usize,
) -> Result<PreferenceInput> {
    let default_quota =
        i64::try_from(default_quota).map_err(|_| MatchError::InvalidConfigValueError {
            field: "default_quota".to_string(),
            value: default_quota.to_string(),
            reason: format!("Value must be at most {}", i64::MAX),
        })?;

    let mut known: HashSet<String> = quotas.iter().map(|q| q.lecturer.clone()).collect();
    let mut lecturers: Vec<LecturerEntry> = quotas
        .into_iter()
        .map(|q| LecturerEntry::new(q.lecturer, q.quota))
        .collect();

    let mut missing_quotas = Vec::new();
    for lecturer in scribes.iter().flat_map(|s| &s.preferences) {
        if known.insert(lecturer.clone()) {
            missing_quotas.push(lecturer.clone());
            lecturers.push(LecturerEntry::new(lecturer.clone(), default_quota));
        }
    }
    if !missing_quotas.is_empty() {
        tracing::warn!(
            "⚠️ No quotas provided for lecturers: {}. Setting their quotas to {}",
            missing_quotas.join(", "),
            default_quota
        );
    }

    if let Some(rows) = rankings {
        let mut issues = Vec::new();
        let mut by_lecturer: HashMap<String, Vec<String>> = HashMap::with_capacity(rows.len());
        for row in rows {
            // 沒有任何選擇的列視同未提供，改用輸入順序
            if row.choices.is_empty() {
                tracing::debug!("Lecturer '{}' has an empty preference row; ignoring it", row.name);
                continue;
            }
            if !known.contains(&row.name) {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::UnknownLecturer,
                    format!("Preferences given for unknown lecturer '{}'", row.name),
                ));
            } else if by_lecturer.contains_key(&row.name) {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateIdentity,
                    format!("Lecturer '{}' has more than one preference row", row.name),
                ));
            } else {
                by_lecturer.insert(row.name, row.choices);
            }
        }
        if !issues.is_empty() {
            return Err(MatchError::InvalidPreferences { issues });
        }

        let mut without_rankings = Vec::new();
        for lecturer in &mut lecturers {
            match by_lecturer.remove(&lecturer.name) {
                Some(choices) => lecturer.preference = LecturerPreference::Ranked(choices),
                None => without_rankings.push(lecturer.name.clone()),
            }
        }
        if !without_rankings.is_empty() {
            tracing::warn!(
                "⚠️ No preferences found for lecturers: {}. Ranking their applicants by input order",
                without_rankings.join(", ")
            );
        }
    }

    Ok(PreferenceInput { scribes, lecturers })
}
