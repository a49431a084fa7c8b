use std::cmp::Reverse;
use std::collections::HashSet;

use crate::config::{EngineConfig, PatternMode};
use crate::models::{
    Category, CategoryResult, OrganizedField, OrganizedResult, Recommendation, RecommendationKind,
    Severity,
};

use super::messages::MessageTemplates;
use super::range::{Judgment, RangeSpec};
use super::registry;
use super::rules;

/// A field the single-field rule judged abnormal.
struct Flagged<'a> {
    category: Category,
    key: &'a str,
    position: usize,
    field: &'a OrganizedField,
    /// Range text the judgment was made against.
    normal_range: &'a str,
    judgment: Judgment,
    severity: Severity,
}

/// Output ordering: severity (highest first), category, field position, field before pattern.
type RankKey = (Reverse<Severity>, usize, usize, RecommendationKind);

/// Evaluate an organized result with the default configuration.
pub fn evaluate(organized: &OrganizedResult) -> Vec<Recommendation> {
    evaluate_with(organized, &EngineConfig::default())
}

/// Evaluate an organized result against the rule table.
///
/// Pure: the same input always yields the same recommendations in the same order.
pub fn evaluate_with(organized: &OrganizedResult, config: &EngineConfig) -> Vec<Recommendation> {
    let flagged: Vec<Flagged<'_>> = organized
        .iter()
        .flat_map(|(category, result)| flag_fields(category, result))
        .collect();
    let patterns = detect_patterns(&flagged);

    let summarized: HashSet<(Category, &str)> = match config.pattern_mode {
        PatternMode::Additive => HashSet::new(),
        PatternMode::Replace => patterns
            .iter()
            .flat_map(|(_, members)| members.iter().map(|f| (f.category, f.key)))
            .collect(),
    };

    let mut ranked: Vec<(RankKey, Recommendation)> = Vec::new();

    for f in flagged
        .iter()
        .filter(|f| !summarized.contains(&(f.category, f.key)))
    {
        let key = (
            Reverse(f.severity),
            f.category.index(),
            f.position,
            RecommendationKind::Field,
        );
        ranked.push((key, field_recommendation(f)));
    }

    for (group, members) in &patterns {
        let rec = pattern_recommendation(group, members);
        let key = (
            Reverse(rec.severity),
            members[0].category.index(),
            members[0].position,
            RecommendationKind::Pattern,
        );
        ranked.push((key, rec));
    }

    ranked.retain(|(_, r)| r.severity >= config.min_severity);
    ranked.sort_by(|a, b| a.0.cmp(&b.0));

    tracing::debug!(
        categories = organized.len(),
        flagged = flagged.len(),
        recommendations = ranked.len(),
        "Lab result evaluation complete"
    );

    ranked.into_iter().map(|(_, r)| r).collect()
}

/// Apply the single-field range rule to every field of a category.
fn flag_fields<'a>(category: Category, result: &'a CategoryResult) -> Vec<Flagged<'a>> {
    let registered = registry::fields_of(category).len();
    let mut flagged = Vec::new();

    for (index, (key, field)) in result.fields.iter().enumerate() {
        let definition = registry::definition_of(category, key);
        let normal_range = definition.map_or(field.normal_range.as_str(), |d| d.normal_range);

        let Some(range) = RangeSpec::parse(normal_range) else {
            tracing::trace!(field = key, range = normal_range, "Reference range not judgeable, skipped");
            continue;
        };
        let Some(judgment) = range.judge(&field.value) else {
            tracing::trace!(field = key, value = %field.value, "Value not comparable with range, skipped");
            continue;
        };
        if !judgment.is_abnormal() {
            continue;
        }

        let numeric = match range {
            RangeSpec::Qualitative { .. } => None,
            _ => field.value.as_number(),
        };

        flagged.push(Flagged {
            category,
            key,
            position: registry::position_of(category, key).unwrap_or(registered + index),
            field,
            normal_range,
            judgment,
            severity: rules::field_severity(category, key, judgment, numeric),
        });
    }

    flagged.sort_by_key(|f| f.position);
    flagged
}

/// Groups with enough flagged members, in order of their first member.
/// A group spans categories; its pattern belongs to the first member's category.
fn detect_patterns<'f, 'a>(flagged: &'f [Flagged<'a>]) -> Vec<(&'a str, Vec<&'f Flagged<'a>>)> {
    let mut groups: Vec<(&'a str, Vec<&'f Flagged<'a>>)> = Vec::new();

    for f in flagged {
        let group = f.field.group.as_str();
        match groups.iter_mut().find(|(g, _)| *g == group) {
            Some((_, members)) => members.push(f),
            None => groups.push((group, vec![f])),
        }
    }

    groups.retain(|(group, members)| {
        let needed = rules::pattern_rule(members[0].category, group)
            .map_or(rules::MIN_PATTERN_FIELDS, |r| r.min_flagged);
        !group.is_empty() && *group != registry::META_GROUP && members.len() >= needed
    });
    groups
}

fn field_recommendation(f: &Flagged<'_>) -> Recommendation {
    let message = match f.judgment {
        Judgment::Unexpected => MessageTemplates::unexpected_result(
            &f.field.label,
            &f.field.value,
            f.normal_range,
            f.severity,
        ),
        judgment => MessageTemplates::out_of_range(
            &f.field.label,
            &f.field.value,
            f.normal_range,
            judgment,
            f.severity,
        ),
    };

    Recommendation::new(
        f.severity,
        f.category,
        RecommendationKind::Field,
        None,
        vec![f.key.to_string()],
        message,
        format!("range:{}", f.key),
    )
}

fn pattern_recommendation(group: &str, members: &[&Flagged<'_>]) -> Recommendation {
    let category = members[0].category;
    let labels: Vec<&str> = members.iter().map(|f| f.field.label.as_str()).collect();
    let highest = members
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(rules::DEFAULT_FIELD_SEVERITY);

    let (severity, message) = match rules::pattern_rule(category, group) {
        Some(rule) => (
            rule.severity.unwrap_or(highest),
            MessageTemplates::pattern(rule.summary, &labels, rule.advice),
        ),
        None => (highest, MessageTemplates::generic_pattern(group, &labels)),
    };

    Recommendation::new(
        severity,
        category,
        RecommendationKind::Pattern,
        Some(group.to_string()),
        members.iter().map(|f| f.key.to_string()).collect(),
        message,
        format!("pattern:{}:{}", category, group),
    )
}
