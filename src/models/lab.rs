use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::enums::Category;

// ---------------------------------------------------------------------------
// LabValue
// ---------------------------------------------------------------------------

/// Canonical scalar value of a single test field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl LabValue {
    /// Build from a JSON scalar. Null and structured values yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::Bool(b) => Some(Self::Flag(*b)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Numeric reading, accepting text such as `" 7.0 "`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Self::Flag(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True for text that is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for LabValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<f64> for LabValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for LabValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// FieldDefinition
// ---------------------------------------------------------------------------

/// One entry of the field registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub normal_range: &'static str,
    pub category: Category,
    pub group: &'static str,
}

// ---------------------------------------------------------------------------
// OrganizedResult
// ---------------------------------------------------------------------------

/// A present value together with the registry metadata needed to display and judge it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizedField {
    pub label: String,
    pub value: LabValue,
    pub normal_range: String,
    pub group: String,
}

/// Field key → organized field, kept in registration order.
/// Serialized as a JSON object whose member order is the registration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap(Vec<(String, OrganizedField)>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, field: OrganizedField) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = field,
            None => self.0.push((key, field)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OrganizedField> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OrganizedField)> {
        self.0.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, field) in &self.0 {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field key to organized field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut fields = FieldMap::new();
                while let Some((key, field)) = access.next_entry::<String, OrganizedField>()? {
                    fields.insert(key, field);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Present fields of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub title: String,
    pub fields: FieldMap,
}

/// Category → present fields. Only categories with at least one present value appear.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct OrganizedResult {
    categories: BTreeMap<Category, CategoryResult>,
}

impl<'de> Deserialize<'de> for OrganizedResult {
    /// Categories arriving without fields are dropped so the presence invariant holds.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut categories = BTreeMap::<Category, CategoryResult>::deserialize(deserializer)?;
        categories.retain(|_, c| !c.fields.is_empty());
        Ok(Self { categories })
    }
}

impl OrganizedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category. Empty field maps are dropped so the presence invariant holds.
    pub fn insert(&mut self, category: Category, fields: FieldMap) {
        if fields.is_empty() {
            return;
        }
        self.categories.insert(
            category,
            CategoryResult {
                title: category.title().to_string(),
                fields,
            },
        );
    }

    pub fn get(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.get(&category)
    }

    pub fn field(&self, category: Category, key: &str) -> Option<&OrganizedField> {
        self.get(category).and_then(|c| c.fields.get(key))
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    /// Categories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryResult)> {
        self.categories.iter().map(|(c, r)| (*c, r))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of present fields across all categories.
    pub fn field_count(&self) -> usize {
        self.categories.values().map(|c| c.fields.len()).sum()
    }
}
