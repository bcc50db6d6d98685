use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct AssignmentRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AssignmentRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&mut self) -> Result<String> {
        tracing::info!("📋 Loading preference data...");
        let input = self.pipeline.extract()?;
        tracing::info!(
            "✅ Loaded {} scribes and {} lecturers",
            input.scribes.len(),
            input.lecturers.len()
        );

        tracing::info!("🧮 Solving matching problem...");
        let report = self.pipeline.transform(input)?;
        tracing::info!(
            "✅ Matching completed: {} of {} scribes assigned",
            report.assignment.matched_count(),
            report.scribes.len()
        );

        let destination = self.pipeline.load(report)?;
        tracing::debug!("Results written to {}", destination);

        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Assignment, LecturerEntry, MatchReport, MatchStats, PreferenceInput, ScribeEntry,
    };
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPipeline {
        steps: RefCell<Vec<&'static str>>,
    }

    impl Pipeline for RecordingPipeline {
        fn extract(&mut self) -> Result<PreferenceInput> {
            self.steps.borrow_mut().push("extract");
            Ok(PreferenceInput {
                scribes: vec![ScribeEntry::new("Alice", ["Prof_A"])],
                lecturers: vec![LecturerEntry::new("Prof_A", 1)],
            })
        }

        fn transform(&self, input: PreferenceInput) -> Result<MatchReport> {
            self.steps.borrow_mut().push("transform");
            Ok(MatchReport {
                scribes: input.scribes.into_iter().map(|s| s.name).collect(),
                assignment: Assignment::default(),
                under_filled: vec![],
                stats: MatchStats::default(),
                stable: true,
                violations: vec![],
            })
        }

        fn load(&self, _report: MatchReport) -> Result<String> {
            self.steps.borrow_mut().push("load");
            Ok("stdout".to_string())
        }
    }

    #[test]
    fn test_runner_executes_stages_in_order() {
        let mut runner = AssignmentRunner::new(RecordingPipeline::default());
        let destination = runner.run().unwrap();

        assert_eq!(destination, "stdout");
        assert_eq!(*runner.pipeline.steps.borrow(), vec!["extract", "transform", "load"]);
    }
}
