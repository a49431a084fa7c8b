use std::time::Instant;

use crate::config::EngineConfig;
use crate::models::{OrganizedResult, Recommendation, RecommendationCounts};

use super::evaluate::evaluate_with;
use super::extract::RawRecord;
use super::organize::organize;
use super::types::{Interpretation, LabInterpreter};

/// Default implementation of the interpreter.
/// Holds only configuration; every call works on its own inputs.
#[derive(Debug, Clone, Default)]
pub struct DefaultLabInterpreter {
    config: EngineConfig,
}

impl DefaultLabInterpreter {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl LabInterpreter for DefaultLabInterpreter {
    fn organize(&self, record: &dyn RawRecord) -> OrganizedResult {
        organize(record)
    }

    fn evaluate(&self, organized: &OrganizedResult) -> Vec<Recommendation> {
        evaluate_with(organized, &self.config)
    }

    fn interpret(&self, record: &dyn RawRecord) -> Interpretation {
        let start = Instant::now();

        let organized = self.organize(record);
        let recommendations = self.evaluate(&organized);
        let counts = RecommendationCounts::from_recommendations(&recommendations);

        let processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            categories = organized.len(),
            fields = organized.field_count(),
            critical = counts.critical,
            warning = counts.warning,
            info = counts.info,
            processing_ms = processing_time_ms,
            "Lab result interpretation complete"
        );

        Interpretation {
            organized,
            recommendations,
            counts,
            generated_at: chrono::Local::now().naive_local(),
            processing_time_ms,
        }
    }
}
