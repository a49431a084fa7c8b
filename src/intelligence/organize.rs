use crate::models::{Category, FieldMap, OrganizedField, OrganizedResult};

use super::extract::{extract, RawRecord};
use super::registry;

/// Build the per-category report structure from a stored test record.
///
/// Walks the registry in registration order, so keys the registry does not
/// know are never looked at. Meta fields, absent values and blank text are
/// left out, and categories without any present value are omitted.
pub fn organize<R: RawRecord + ?Sized>(record: &R) -> OrganizedResult {
    let mut organized = OrganizedResult::new();

    for category in Category::ALL {
        let fields = organize_category(category, record);
        organized.insert(category, fields);
    }

    tracing::debug!(
        categories = organized.len(),
        fields = organized.field_count(),
        "Organized lab record"
    );

    organized
}

fn organize_category<R: RawRecord + ?Sized>(category: Category, record: &R) -> FieldMap {
    let mut fields = FieldMap::new();

    for definition in registry::fields_of(category)
        .iter()
        .filter(|f| !registry::is_meta_field(f.key))
    {
        let Some(value) = extract(definition.key, record) else {
            continue;
        };
        if value.is_blank() {
            continue;
        }
        fields.insert(
            definition.key,
            OrganizedField {
                label: definition.label.to_string(),
                value,
                normal_range: definition.normal_range.to_string(),
                group: definition.group.to_string(),
            },
        );
    }

    fields
}
