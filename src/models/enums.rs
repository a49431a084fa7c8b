use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Variant declaration order is the enum's `Ord` order.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Clinical panel a test field belongs to, in registration order.
    Category {
        Chemistry => "chemistry",
        Immunology => "immunology",
        Hematology => "hematology",
        Urinalysis => "urinalysis",
    }
);

impl Category {
    /// Every category, in the order the registry walks them.
    pub const ALL: [Category; 4] = [
        Category::Chemistry,
        Category::Immunology,
        Category::Hematology,
        Category::Urinalysis,
    ];

    /// Section title shown above the category on a report.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Chemistry => "Clinical Chemistry",
            Self::Immunology => "Serology / Immunology",
            Self::Hematology => "Hematology",
            Self::Urinalysis => "Clinical Microscopy / Urinalysis",
        }
    }

    /// Position in registration order, used as an ordering tie-breaker.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

str_enum!(
    /// Clinical urgency of a recommendation. Ordered `Info < Warning < Critical`.
    Severity {
        /// Worth noting, no action implied.
        Info => "info",
        /// Outside the expected range; review with the requesting physician.
        Warning => "warning",
        /// Needs prompt attention.
        Critical => "critical",
    }
);

str_enum!(
    /// Whether a recommendation was raised by a single field or by a group pattern.
    RecommendationKind {
        Field => "field",
        Pattern => "pattern",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_round_trip() {
        for (variant, s) in [
            (Category::Chemistry, "chemistry"),
            (Category::Immunology, "immunology"),
            (Category::Hematology, "hematology"),
            (Category::Urinalysis, "urinalysis"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Category::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn category_order_matches_registration() {
        let mut shuffled = vec![
            Category::Urinalysis,
            Category::Chemistry,
            Category::Hematology,
            Category::Immunology,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL.to_vec());
        assert_eq!(Category::Hematology.index(), 2);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Category::from_str("radiology").is_err());
        assert!(Severity::from_str("").is_err());
        let err = Severity::from_str("urgent").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Severity value: urgent");
    }
}
