use crate::models::{LabValue, Severity};

use super::range::Judgment;

/// Message template builder for consistent, clinician-facing wording.
/// Every message names the observed value and the reference it was judged against.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Numeric result outside its reference range.
    pub fn out_of_range(
        label: &str,
        value: &LabValue,
        normal_range: &str,
        judgment: Judgment,
        severity: Severity,
    ) -> String {
        let direction = match judgment {
            Judgment::Low => "below",
            Judgment::High => "above",
            _ => "outside",
        };
        let qualifier = if severity == Severity::Critical {
            "critically "
        } else {
            ""
        };
        format!(
            "{} is {}{} the reference range ({}; expected {}). {}",
            label,
            qualifier,
            direction,
            value,
            normal_range,
            Self::follow_up(severity),
        )
    }

    /// Qualitative result that differs from the expected token.
    pub fn unexpected_result(
        label: &str,
        value: &LabValue,
        expected: &str,
        severity: Severity,
    ) -> String {
        format!(
            "{} is {} (expected {}). {}",
            label,
            value,
            expected,
            Self::follow_up(severity),
        )
    }

    /// Several fields of one group flagged together.
    pub fn pattern(summary: &str, labels: &[&str], advice: &str) -> String {
        format!("{}: {}. {}", summary, labels.join(", "), advice)
    }

    /// Group without dedicated wording.
    pub fn generic_pattern(group: &str, labels: &[&str]) -> String {
        format!(
            "{} {} results are outside their reference ranges: {}. Review these results together.",
            labels.len(),
            group.replace('_', " "),
            labels.join(", "),
        )
    }

    fn follow_up(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => "Notify the requesting physician promptly; confirmatory testing is advised.",
            Severity::Warning => "Review with the requesting physician.",
            Severity::Info => "Noted for the requesting physician.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_value_and_range() {
        let msg = MessageTemplates::out_of_range(
            "Glucose (FBS/RBS)",
            &LabValue::Number(7.0),
            "3.89-5.83 mmol/L",
            Judgment::High,
            Severity::Warning,
        );
        assert_eq!(
            msg,
            "Glucose (FBS/RBS) is above the reference range (7; expected 3.89-5.83 mmol/L). \
             Review with the requesting physician."
        );
    }

    #[test]
    fn critical_numeric_is_qualified() {
        let msg = MessageTemplates::out_of_range(
            "Potassium",
            &LabValue::Number(6.8),
            "3.5-5.1 mmol/L",
            Judgment::High,
            Severity::Critical,
        );
        assert!(msg.starts_with("Potassium is critically above"));
        assert!(msg.contains("promptly"));
    }

    #[test]
    fn unexpected_result_message() {
        let msg = MessageTemplates::unexpected_result(
            "HIV 1/2 Screening",
            &LabValue::from("Reactive"),
            "Non-Reactive",
            Severity::Critical,
        );
        assert!(msg.starts_with("HIV 1/2 Screening is Reactive (expected Non-Reactive)."));
    }

    #[test]
    fn pattern_lists_labels() {
        let msg = MessageTemplates::pattern("Liver markers abnormal", &["AST/SGOT", "ALT/SGPT"], "Work up.");
        assert_eq!(msg, "Liver markers abnormal: AST/SGOT, ALT/SGPT. Work up.");
        let generic = MessageTemplates::generic_pattern("blood_bank", &["A", "B"]);
        assert!(generic.starts_with("2 blood bank results"));
    }
}
