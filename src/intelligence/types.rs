use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{OrganizedResult, Recommendation, RecommendationCounts, Severity};

use super::extract::RawRecord;

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Organized report plus advisory panel for one stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpretation {
    pub organized: OrganizedResult,
    pub recommendations: Vec<Recommendation>,
    pub counts: RecommendationCounts,
    pub generated_at: NaiveDateTime,
    pub processing_time_ms: u64,
}

impl Interpretation {
    /// Critical recommendations, in output order.
    pub fn critical(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.severity == Severity::Critical)
    }

    pub fn has_critical(&self) -> bool {
        self.counts.critical > 0
    }
}

// ---------------------------------------------------------------------------
// LabInterpreter trait
// ---------------------------------------------------------------------------

/// Entry point used by the presentation layer.
pub trait LabInterpreter {
    /// Build the per-category report structure. Never fails.
    fn organize(&self, record: &dyn RawRecord) -> OrganizedResult;

    /// Run the clinical rules over an organized result. Pure and deterministic.
    fn evaluate(&self, organized: &OrganizedResult) -> Vec<Recommendation>;

    /// Organize then evaluate.
    fn interpret(&self, record: &dyn RawRecord) -> Interpretation;
}
