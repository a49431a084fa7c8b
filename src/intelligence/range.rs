use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::LabValue;

/// Qualitative reference tokens the evaluator can judge against.
const QUALITATIVE_TOKENS: [&str; 3] = ["negative", "nonreactive", "normal"];

/// Regex patterns for reference range text (compiled once via LazyLock).
/// "lo-hi unit", e.g. "3.89-5.83 mmol/L", "0.37-0.47", "0-5 /hpf"
static RE_BETWEEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)(?:[^\d.].*)?$").unwrap()
});
/// "<x unit" or ">x unit", e.g. "<3.0 mg/L", ">1.04 mmol/L"
static RE_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([<>])\s*(\d+(?:\.\d+)?)(?:[^\d.].*)?$").unwrap()
});

/// A reference range the evaluator knows how to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeSpec {
    /// Inclusive interval.
    Between { low: f64, high: f64 },
    /// Value must be strictly below the limit.
    Below { limit: f64 },
    /// Value must be strictly above the limit.
    Above { limit: f64 },
    /// Expected qualitative token, e.g. "Non-Reactive".
    Qualitative { expected: String },
}

/// Outcome of comparing a value with its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Normal,
    Low,
    High,
    /// Qualitative result differs from the expected token.
    Unexpected,
}

impl Judgment {
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl RangeSpec {
    /// Parse reference range text. Returns `None` when no judgment is possible
    /// (empty text, descriptive ranges such as "Few", inverted intervals).
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(caps) = RE_BETWEEN.captures(text) {
            let low = caps.get(1)?.as_str().parse::<f64>().ok()?;
            let high = caps.get(2)?.as_str().parse::<f64>().ok()?;
            return (low <= high).then_some(Self::Between { low, high });
        }
        if let Some(caps) = RE_BOUND.captures(text) {
            let limit = caps.get(2)?.as_str().parse::<f64>().ok()?;
            return match caps.get(1)?.as_str() {
                "<" => Some(Self::Below { limit }),
                _ => Some(Self::Above { limit }),
            };
        }
        let token = normalize_token(text);
        QUALITATIVE_TOKENS
            .contains(&token.as_str())
            .then(|| Self::Qualitative {
                expected: text.trim().to_string(),
            })
    }

    /// Compare `value` with this range. `None` when the value cannot be judged
    /// against it: free text against a numeric interval, or a number against a
    /// qualitative token.
    pub fn judge(&self, value: &LabValue) -> Option<Judgment> {
        match self {
            Self::Between { low, high } => {
                let n = value.as_number()?;
                Some(if n < *low {
                    Judgment::Low
                } else if n > *high {
                    Judgment::High
                } else {
                    Judgment::Normal
                })
            }
            Self::Below { limit } => {
                let n = value.as_number()?;
                Some(if n < *limit { Judgment::Normal } else { Judgment::High })
            }
            Self::Above { limit } => {
                let n = value.as_number()?;
                Some(if n > *limit { Judgment::Normal } else { Judgment::Low })
            }
            Self::Qualitative { expected } => {
                let matches = match value {
                    LabValue::Flag(positive) => !positive,
                    // A number carries no qualitative reading.
                    other if other.as_number().is_some() => return None,
                    other => normalize_token(&other.to_string()) == normalize_token(expected),
                };
                Some(if matches {
                    Judgment::Normal
                } else {
                    Judgment::Unexpected
                })
            }
        }
    }
}

/// Case-insensitive token with spaces and hyphens removed ("Non-Reactive" → "nonreactive").
fn normalize_token(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_interval_with_unit() {
        assert_eq!(
            RangeSpec::parse("3.89-5.83 mmol/L"),
            Some(RangeSpec::Between { low: 3.89, high: 5.83 })
        );
        assert_eq!(
            RangeSpec::parse("0-5 /hpf"),
            Some(RangeSpec::Between { low: 0.0, high: 5.0 })
        );
        assert_eq!(
            RangeSpec::parse("0.37-0.47"),
            Some(RangeSpec::Between { low: 0.37, high: 0.47 })
        );
        assert_eq!(
            RangeSpec::parse("4.2-5.4 x10^12/L"),
            Some(RangeSpec::Between { low: 4.2, high: 5.4 })
        );
    }

    #[test]
    fn parse_one_sided_limits() {
        assert_eq!(RangeSpec::parse("<3.0 mg/L"), Some(RangeSpec::Below { limit: 3.0 }));
        assert_eq!(RangeSpec::parse(">1.04 mmol/L"), Some(RangeSpec::Above { limit: 1.04 }));
        assert_eq!(RangeSpec::parse("<200IU/mL"), Some(RangeSpec::Below { limit: 200.0 }));
    }

    #[test]
    fn parse_qualitative_tokens() {
        for text in ["Non-Reactive", "Negative", "Normal", " non reactive "] {
            assert!(
                matches!(RangeSpec::parse(text), Some(RangeSpec::Qualitative { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn unparseable_ranges_are_none() {
        for text in ["", "Few", "Light Yellow to Amber", "Clear", "5.0-1.0 mmol/L", "approx 4"] {
            assert_eq!(RangeSpec::parse(text), None, "{text}");
        }
    }

    #[test]
    fn judge_interval_inclusive() {
        let range = RangeSpec::Between { low: 3.89, high: 5.83 };
        assert_eq!(range.judge(&LabValue::Number(7.0)), Some(Judgment::High));
        assert_eq!(range.judge(&LabValue::Number(3.0)), Some(Judgment::Low));
        assert_eq!(range.judge(&LabValue::Number(5.83)), Some(Judgment::Normal));
        assert_eq!(range.judge(&LabValue::from("4.5")), Some(Judgment::Normal));
        assert_eq!(range.judge(&LabValue::from("hemolyzed")), None);
    }

    #[test]
    fn judge_one_sided_limits_are_strict() {
        let below = RangeSpec::Below { limit: 3.0 };
        assert_eq!(below.judge(&LabValue::Number(2.9)), Some(Judgment::Normal));
        assert_eq!(below.judge(&LabValue::Number(3.0)), Some(Judgment::High));

        let above = RangeSpec::Above { limit: 1.04 };
        assert_eq!(above.judge(&LabValue::Number(1.2)), Some(Judgment::Normal));
        assert_eq!(above.judge(&LabValue::Number(1.04)), Some(Judgment::Low));
    }

    #[test]
    fn judge_qualitative() {
        let range = RangeSpec::parse("Non-Reactive").unwrap();
        assert_eq!(range.judge(&LabValue::from("Reactive")), Some(Judgment::Unexpected));
        assert_eq!(range.judge(&LabValue::from("non-reactive")), Some(Judgment::Normal));
        assert_eq!(range.judge(&LabValue::from("NONREACTIVE")), Some(Judgment::Normal));
        assert_eq!(range.judge(&LabValue::Flag(true)), Some(Judgment::Unexpected));
        assert_eq!(range.judge(&LabValue::Flag(false)), Some(Judgment::Normal));
        assert!(Judgment::Unexpected.is_abnormal());
        assert!(!Judgment::Normal.is_abnormal());
    }

    #[test]
    fn numbers_not_judged_against_qualitative_tokens() {
        let range = RangeSpec::parse("Non-Reactive").unwrap();
        assert_eq!(range.judge(&LabValue::Number(0.0)), None);
        assert_eq!(range.judge(&LabValue::Number(1.0)), None);
        assert_eq!(range.judge(&LabValue::from(" 0 ")), None);
    }
}
