//! Clinical rule table. Thresholds and wording live here as data so they can be
//! reviewed without reading the evaluator.

use crate::models::{Category, Severity};

use super::range::Judgment;

/// Severity of an out-of-range field without an entry in [`FIELD_RULES`].
pub const DEFAULT_FIELD_SEVERITY: Severity = Severity::Warning;

/// Flagged fields a group needs before a pattern recommendation is raised.
pub const MIN_PATTERN_FIELDS: usize = 2;

// ---------------------------------------------------------------------------
// Single-field rules
// ---------------------------------------------------------------------------

/// Per-field override of the out-of-range severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub category: Category,
    pub key: &'static str,
    /// Severity of any out-of-range result.
    pub severity: Severity,
    /// Panic values: at or beyond these the result is critical.
    pub critical_low: Option<f64>,
    pub critical_high: Option<f64>,
}

const fn escalate(category: Category, key: &'static str) -> FieldRule {
    FieldRule {
        category,
        key,
        severity: Severity::Critical,
        critical_low: None,
        critical_high: None,
    }
}

const fn note(category: Category, key: &'static str) -> FieldRule {
    FieldRule {
        category,
        key,
        severity: Severity::Info,
        critical_low: None,
        critical_high: None,
    }
}

const fn panic_values(category: Category, key: &'static str, low: f64, high: f64) -> FieldRule {
    FieldRule {
        category,
        key,
        severity: DEFAULT_FIELD_SEVERITY,
        critical_low: Some(low),
        critical_high: Some(high),
    }
}

pub static FIELD_RULES: &[FieldRule] = &[
    // Transmissible-disease markers: any reactive or positive result is urgent.
    escalate(Category::Immunology, "hepatitis_b"),
    escalate(Category::Immunology, "anti_hcv"),
    escalate(Category::Immunology, "hiv"),
    escalate(Category::Immunology, "syphilis"),
    escalate(Category::Immunology, "dengue_ns1"),
    escalate(Category::Immunology, "dengue_igm"),
    escalate(Category::Immunology, "typhidot_igm"),
    note(Category::Immunology, "pregnancy_test"),
    panic_values(Category::Chemistry, "fbs", 2.2, 22.2),
    panic_values(Category::Chemistry, "sodium", 120.0, 160.0),
    panic_values(Category::Chemistry, "potassium", 2.8, 6.2),
    panic_values(Category::Chemistry, "calcium", 1.65, 3.25),
    panic_values(Category::Hematology, "hemoglobin", 70.0, 200.0),
    panic_values(Category::Hematology, "wbc_count", 2.0, 30.0),
    panic_values(Category::Hematology, "platelet_count", 20.0, 1000.0),
];

pub fn field_rule(category: Category, key: &str) -> Option<&'static FieldRule> {
    FIELD_RULES
        .iter()
        .find(|r| r.category == category && r.key == key)
}

/// Severity of an abnormal judgment for `key`. `numeric` is the observed value
/// when it is a number, used for panic-value checks.
pub fn field_severity(
    category: Category,
    key: &str,
    judgment: Judgment,
    numeric: Option<f64>,
) -> Severity {
    let Some(rule) = field_rule(category, key) else {
        return DEFAULT_FIELD_SEVERITY;
    };

    let beyond_panic = match (judgment, numeric) {
        (Judgment::Low, Some(n)) => rule.critical_low.is_some_and(|limit| n <= limit),
        (Judgment::High, Some(n)) => rule.critical_high.is_some_and(|limit| n >= limit),
        _ => false,
    };

    if beyond_panic {
        Severity::Critical
    } else {
        rule.severity
    }
}

// ---------------------------------------------------------------------------
// Cross-field pattern rules
// ---------------------------------------------------------------------------

/// Wording and severity for a group whose fields are flagged together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternRule {
    pub category: Category,
    pub group: &'static str,
    pub min_flagged: usize,
    /// Fixed severity; `None` takes the highest member severity.
    pub severity: Option<Severity>,
    pub summary: &'static str,
    pub advice: &'static str,
}

const fn pattern(
    category: Category,
    group: &'static str,
    severity: Option<Severity>,
    summary: &'static str,
    advice: &'static str,
) -> PatternRule {
    PatternRule {
        category,
        group,
        min_flagged: MIN_PATTERN_FIELDS,
        severity,
        summary,
        advice,
    }
}

pub static PATTERN_RULES: &[PatternRule] = &[
    pattern(
        Category::Chemistry,
        "glucose",
        None,
        "Glucose and HbA1c are both outside their reference ranges",
        "Findings suggest impaired glycemic control; consider a diabetes evaluation.",
    ),
    pattern(
        Category::Chemistry,
        "renal",
        None,
        "Several renal function markers are abnormal",
        "Evaluate kidney function; correlate with eGFR and urinalysis.",
    ),
    pattern(
        Category::Chemistry,
        "lipids",
        None,
        "Several lipid parameters are abnormal",
        "Assess cardiovascular risk and review diet and lipid-lowering therapy.",
    ),
    pattern(
        Category::Chemistry,
        "liver",
        None,
        "Several liver panel markers are abnormal at the same time",
        "Consider a hepatic work-up and correlate with clinical history and medications.",
    ),
    pattern(
        Category::Chemistry,
        "electrolytes",
        None,
        "Several electrolytes are abnormal",
        "Review hydration status, medications and renal function.",
    ),
    pattern(
        Category::Immunology,
        "hepatitis",
        Some(Severity::Critical),
        "More than one viral hepatitis marker is reactive",
        "Refer for confirmatory testing and hepatology evaluation.",
    ),
    pattern(
        Category::Immunology,
        "dengue",
        Some(Severity::Critical),
        "More than one dengue marker is positive",
        "Correlate with platelet count and hematocrit; monitor for warning signs.",
    ),
    pattern(
        Category::Immunology,
        "typhoid",
        None,
        "Typhidot IgM and IgG are both positive",
        "Correlate with fever history; consider blood culture.",
    ),
    pattern(
        Category::Immunology,
        "inflammation",
        None,
        "Several inflammatory markers are raised",
        "Correlate with signs of infection or autoimmune disease.",
    ),
    pattern(
        Category::Hematology,
        "red_cells",
        None,
        "Red cell parameters are abnormal together",
        "Consider evaluation for anemia or polycythemia.",
    ),
    pattern(
        Category::Hematology,
        "indices",
        None,
        "Red cell indices are abnormal together",
        "Review for a microcytic or macrocytic pattern.",
    ),
    pattern(
        Category::Hematology,
        "white_cells",
        None,
        "Leukocyte count and differential are abnormal together",
        "Correlate with signs of infection or a hematologic disorder.",
    ),
    pattern(
        Category::Hematology,
        "coagulation",
        None,
        "Bleeding and clotting times are both abnormal",
        "Consider a coagulation profile before invasive procedures.",
    ),
    pattern(
        Category::Urinalysis,
        "chemical",
        None,
        "Several urine chemistry parameters are abnormal",
        "Correlate with urine microscopy and clinical symptoms.",
    ),
    pattern(
        Category::Urinalysis,
        "microscopic",
        None,
        "Urine microscopy shows several abnormal findings",
        "Consider a urinary tract infection work-up.",
    ),
];

pub fn pattern_rule(category: Category, group: &str) -> Option<&'static PatternRule> {
    PATTERN_RULES
        .iter()
        .find(|r| r.category == category && r.group == group)
}
