use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Category, RecommendationKind, Severity};

/// Namespace for deterministic recommendation ids.
const RECOMMENDATION_NAMESPACE: Uuid = Uuid::from_u128(0x6c61_6277_6973_4500_8000_0000_0000_0001);

/// One decision-support observation raised by the rule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Stable id: the same rule firing on the same fields always yields the same id.
    pub id: Uuid,
    pub severity: Severity,
    pub category: Category,
    pub kind: RecommendationKind,
    /// Sub-panel tagged by a pattern recommendation.
    pub group: Option<String>,
    /// Originating fields, in registration order, without duplicates.
    pub field_keys: Vec<String>,
    pub message: String,
    /// Identifier of the rule that fired, e.g. `range:fbs` or `pattern:chemistry:liver`.
    pub rule: String,
}

impl Recommendation {
    pub fn new(
        severity: Severity,
        category: Category,
        kind: RecommendationKind,
        group: Option<String>,
        field_keys: Vec<String>,
        message: String,
        rule: String,
    ) -> Self {
        let mut keys: Vec<String> = Vec::with_capacity(field_keys.len());
        for key in field_keys {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        let id = recommendation_id(&rule, &keys);
        Self {
            id,
            severity,
            category,
            kind,
            group,
            field_keys: keys,
            message,
            rule,
        }
    }

    pub fn references(&self, key: &str) -> bool {
        self.field_keys.iter().any(|k| k == key)
    }
}

fn recommendation_id(rule: &str, field_keys: &[String]) -> Uuid {
    let name = format!("{rule}|{}", field_keys.join(","));
    Uuid::new_v5(&RECOMMENDATION_NAMESPACE, name.as_bytes())
}

// ---------------------------------------------------------------------------
// RecommendationCounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RecommendationCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl RecommendationCounts {
    pub fn from_recommendations(recommendations: &[Recommendation]) -> Self {
        recommendations
            .iter()
            .fold(Self::default(), |mut counts, r| {
                match r.severity {
                    Severity::Critical => counts.critical += 1,
                    Severity::Warning => counts.warning += 1,
                    Severity::Info => counts.info += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(severity: Severity, keys: &[&str], rule: &str) -> Recommendation {
        Recommendation::new(
            severity,
            Category::Chemistry,
            RecommendationKind::Field,
            None,
            keys.iter().map(|k| k.to_string()).collect(),
            "message".into(),
            rule.into(),
        )
    }

    #[test]
    fn field_keys_deduplicated_in_order() {
        let rec = make(Severity::Warning, &["ast_sgot", "alt_sgpt", "ast_sgot"], "pattern:x");
        assert_eq!(rec.field_keys, vec!["ast_sgot", "alt_sgpt"]);
        assert!(rec.references("alt_sgpt"));
        assert!(!rec.references("fbs"));
    }

    #[test]
    fn id_is_deterministic() {
        let a = make(Severity::Warning, &["fbs"], "range:fbs");
        let b = make(Severity::Warning, &["fbs"], "range:fbs");
        let c = make(Severity::Warning, &["bun"], "range:bun");
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn counts_total() {
        let recs = vec![
            make(Severity::Critical, &["hiv"], "range:hiv"),
            make(Severity::Warning, &["fbs"], "range:fbs"),
            make(Severity::Warning, &["bun"], "range:bun"),
            make(Severity::Info, &["pregnancy_test"], "range:pregnancy_test"),
        ];
        let counts = RecommendationCounts::from_recommendations(&recs);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.warning, 2);
        assert_eq!(counts.info, 1);
        assert_eq!(counts.total(), 4);
    }
}
