//! Field registry: every test field the laboratory reports, grouped by clinical
//! panel. The tables are compiled constants; callers share them by reference.
//!
//! Reference ranges are adult intervals in SI units as printed on the
//! laboratory's result forms. Keys are part of the stored-record contract and
//! must stay stable across releases.

use crate::models::{Category, FieldDefinition};

/// Date the test was performed. Present on every stored record, never reported as a result.
pub const DATE_PERFORMED: &str = "date_performed";
/// Time the test was performed.
pub const TIME_PERFORMED: &str = "time_performed";

/// Group name shared by the meta fields.
pub const META_GROUP: &str = "meta";

const fn field(
    category: Category,
    key: &'static str,
    label: &'static str,
    normal_range: &'static str,
    group: &'static str,
) -> FieldDefinition {
    FieldDefinition {
        key,
        label,
        normal_range,
        category,
        group,
    }
}

macro_rules! panel {
    ($category:expr; $(($key:literal, $label:literal, $range:literal, $group:literal)),+ $(,)?) => {
        [
            field($category, DATE_PERFORMED, "Date Performed", "", META_GROUP),
            field($category, TIME_PERFORMED, "Time Performed", "", META_GROUP),
            $(field($category, $key, $label, $range, $group)),+
        ]
    };
}

// ---------------------------------------------------------------------------
// Clinical chemistry
// ---------------------------------------------------------------------------

static CHEMISTRY: &[FieldDefinition] = &panel![Category::Chemistry;
    ("fbs", "Glucose (FBS/RBS)", "3.89-5.83 mmol/L", "glucose"),
    ("hba1c", "HbA1c", "4.0-6.0 %", "glucose"),
    ("bun", "Blood Urea Nitrogen", "2.5-6.4 mmol/L", "renal"),
    ("creatinine", "Creatinine", "53-115 umol/L", "renal"),
    ("bua", "Blood Uric Acid", "0.15-0.45 mmol/L", "renal"),
    ("cholesterol", "Total Cholesterol", "<5.2 mmol/L", "lipids"),
    ("triglycerides", "Triglycerides", "<1.7 mmol/L", "lipids"),
    ("hdl", "HDL Cholesterol", ">1.04 mmol/L", "lipids"),
    ("ldl", "LDL Cholesterol", "<3.4 mmol/L", "lipids"),
    ("vldl", "VLDL Cholesterol", "0.1-1.0 mmol/L", "lipids"),
    ("ast_sgot", "AST/SGOT", "0-37 U/L", "liver"),
    ("alt_sgpt", "ALT/SGPT", "0-42 U/L", "liver"),
    ("alp", "Alkaline Phosphatase", "40-129 U/L", "liver"),
    ("total_bilirubin", "Total Bilirubin", "1.7-21.0 umol/L", "liver"),
    ("direct_bilirubin", "Direct Bilirubin", "0-5.1 umol/L", "liver"),
    ("total_protein", "Total Protein", "66-87 g/L", "liver"),
    ("albumin", "Albumin", "35-52 g/L", "liver"),
    ("sodium", "Sodium", "135-145 mmol/L", "electrolytes"),
    ("potassium", "Potassium", "3.5-5.1 mmol/L", "electrolytes"),
    ("chloride", "Chloride", "98-107 mmol/L", "electrolytes"),
    ("calcium", "Calcium", "2.15-2.55 mmol/L", "electrolytes"),
];

// ---------------------------------------------------------------------------
// Serology / immunology
// ---------------------------------------------------------------------------

static IMMUNOLOGY: &[FieldDefinition] = &panel![Category::Immunology;
    ("hepatitis_b", "Hepatitis B Surface Antigen (HBsAg)", "Non-Reactive", "hepatitis"),
    ("anti_hcv", "Anti-HCV", "Non-Reactive", "hepatitis"),
    ("hiv", "HIV 1/2 Screening", "Non-Reactive", "retroviral"),
    ("syphilis", "Syphilis (RPR/TPHA)", "Non-Reactive", "syphilis"),
    ("dengue_ns1", "Dengue NS1 Antigen", "Negative", "dengue"),
    ("dengue_igg", "Dengue IgG", "Negative", "dengue"),
    ("dengue_igm", "Dengue IgM", "Negative", "dengue"),
    ("typhidot_igm", "Typhidot IgM", "Negative", "typhoid"),
    ("typhidot_igg", "Typhidot IgG", "Negative", "typhoid"),
    ("crp", "C-Reactive Protein", "<3.0 mg/L", "inflammation"),
    ("aso_titer", "ASO Titer", "<200 IU/mL", "inflammation"),
    ("ra_factor", "Rheumatoid Factor", "<14 IU/mL", "inflammation"),
    ("pregnancy_test", "Pregnancy Test (hCG)", "Negative", "pregnancy"),
    ("blood_type", "Blood Type", "", "blood_bank"),
    ("rh_factor", "Rh Factor", "", "blood_bank"),
];

// ---------------------------------------------------------------------------
// Hematology
// ---------------------------------------------------------------------------

static HEMATOLOGY: &[FieldDefinition] = &panel![Category::Hematology;
    ("hemoglobin", "Hemoglobin", "120-160 g/L", "red_cells"),
    ("hematocrit", "Hematocrit", "0.37-0.47", "red_cells"),
    ("rbc_count", "RBC Count", "4.2-5.4 x10^12/L", "red_cells"),
    ("mcv", "MCV", "80-100 fL", "indices"),
    ("mch", "MCH", "27-31 pg", "indices"),
    ("mchc", "MCHC", "320-360 g/L", "indices"),
    ("wbc_count", "WBC Count", "5.0-10.0 x10^9/L", "white_cells"),
    ("neutrophils", "Neutrophils", "0.50-0.70", "white_cells"),
    ("lymphocytes", "Lymphocytes", "0.20-0.40", "white_cells"),
    ("monocytes", "Monocytes", "0.02-0.08", "white_cells"),
    ("eosinophils", "Eosinophils", "0.01-0.04", "white_cells"),
    ("basophils", "Basophils", "0.00-0.01", "white_cells"),
    ("platelet_count", "Platelet Count", "150-400 x10^9/L", "platelets"),
    ("esr", "Erythrocyte Sedimentation Rate", "0-20 mm/hr", "inflammation"),
    ("bleeding_time", "Bleeding Time", "1-3 min", "coagulation"),
    ("clotting_time", "Clotting Time", "2-8 min", "coagulation"),
];

// ---------------------------------------------------------------------------
// Clinical microscopy / urinalysis
// ---------------------------------------------------------------------------

static URINALYSIS: &[FieldDefinition] = &panel![Category::Urinalysis;
    ("urine_color", "Color", "Light Yellow to Amber", "physical"),
    ("urine_transparency", "Transparency", "Clear", "physical"),
    ("urine_ph", "pH", "4.5-8.0", "chemical"),
    ("specific_gravity", "Specific Gravity", "1.005-1.030", "chemical"),
    ("urine_protein", "Protein", "Negative", "chemical"),
    ("urine_glucose", "Glucose", "Negative", "chemical"),
    ("urine_ketones", "Ketones", "Negative", "chemical"),
    ("urine_bilirubin", "Bilirubin", "Negative", "chemical"),
    ("urobilinogen", "Urobilinogen", "Normal", "chemical"),
    ("urine_blood", "Blood", "Negative", "chemical"),
    ("nitrite", "Nitrite", "Negative", "chemical"),
    ("leukocyte_esterase", "Leukocyte Esterase", "Negative", "chemical"),
    ("pus_cells", "Pus Cells", "0-5 /hpf", "microscopic"),
    ("urine_rbc", "Red Blood Cells", "0-2 /hpf", "microscopic"),
    ("epithelial_cells", "Epithelial Cells", "Few", "microscopic"),
    ("bacteria", "Bacteria", "Few", "microscopic"),
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Fields of a category in registration order (meta fields first).
pub fn fields_of(category: Category) -> &'static [FieldDefinition] {
    match category {
        Category::Chemistry => CHEMISTRY,
        Category::Immunology => IMMUNOLOGY,
        Category::Hematology => HEMATOLOGY,
        Category::Urinalysis => URINALYSIS,
    }
}

/// Definition of `key` within `category`, if registered.
pub fn definition_of(category: Category, key: &str) -> Option<&'static FieldDefinition> {
    fields_of(category).iter().find(|f| f.key == key)
}

/// Registration position of `key` within `category`.
pub fn position_of(category: Category, key: &str) -> Option<usize> {
    fields_of(category).iter().position(|f| f.key == key)
}

/// First definition of `key` across categories in registration order.
/// Meta fields resolve to their chemistry entry.
pub fn find(key: &str) -> Option<&'static FieldDefinition> {
    Category::ALL
        .iter()
        .find_map(|category| definition_of(*category, key))
}

/// Every registered field, category by category.
pub fn all_fields() -> impl Iterator<Item = &'static FieldDefinition> {
    Category::ALL
        .iter()
        .flat_map(|category| fields_of(*category).iter())
}

/// Whether `key` is one of the reserved date/time-performed fields.
pub fn is_meta_field(key: &str) -> bool {
    key == DATE_PERFORMED || key == TIME_PERFORMED
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn keys_unique_within_category() {
        for category in Category::ALL {
            let mut seen = HashSet::new();
            for f in fields_of(category) {
                assert!(seen.insert(f.key), "duplicate key {} in {}", f.key, category);
            }
        }
    }

    #[test]
    fn every_field_tagged_with_its_category() {
        for category in Category::ALL {
            assert!(fields_of(category).iter().all(|f| f.category == category));
        }
    }

    #[test]
    fn result_keys_unique_across_categories() {
        let mut seen = HashSet::new();
        for f in all_fields().filter(|f| !is_meta_field(f.key)) {
            assert!(seen.insert(f.key), "{} registered twice", f.key);
        }
        assert!(seen.len() >= 60, "registry has {} result fields", seen.len());
    }

    #[test]
    fn meta_fields_lead_every_category() {
        for category in Category::ALL {
            let fields = fields_of(category);
            assert_eq!(fields[0].key, DATE_PERFORMED);
            assert_eq!(fields[1].key, TIME_PERFORMED);
            assert!(fields[2..].iter().all(|f| f.group != META_GROUP));
        }
    }

    #[test]
    fn fbs_definition() {
        let fbs = definition_of(Category::Chemistry, "fbs").unwrap();
        assert_eq!(fbs.label, "Glucose (FBS/RBS)");
        assert_eq!(fbs.normal_range, "3.89-5.83 mmol/L");
        assert_eq!(fbs.group, "glucose");
    }

    #[test]
    fn unknown_key_is_absent() {
        assert!(definition_of(Category::Chemistry, "unknown_field_xyz").is_none());
        assert!(definition_of(Category::Hematology, "fbs").is_none());
        assert!(find("unknown_field_xyz").is_none());
        assert!(position_of(Category::Chemistry, "hiv").is_none());
    }

    #[test]
    fn find_locates_category() {
        assert_eq!(find("hepatitis_b").unwrap().category, Category::Immunology);
        assert_eq!(find("pus_cells").unwrap().category, Category::Urinalysis);
        assert_eq!(position_of(Category::Chemistry, "fbs"), Some(2));
    }

    #[test]
    fn meta_field_detection() {
        assert!(is_meta_field("date_performed"));
        assert!(is_meta_field("time_performed"));
        assert!(!is_meta_field("fbs"));
    }
}
