//! Read-only grouping and statistics over a scope.

use crate::Record;
use serde::Serialize;
use std::collections::HashMap;

/// One grouping bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Aggregated statistics over a scope, consumed by the JSON export envelope
/// and the records view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub total: usize,
    pub by_family: Vec<GroupCount>,
    pub by_life_form: Vec<GroupCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_girth_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_height_m: Option<f64>,
}

impl Analysis {
    /// Computes the aggregate over `scope`.
    ///
    /// Records without a family or life form are excluded from the respective
    /// grouping; records without a measurement are excluded from that mean's
    /// denominator. Groupings are sorted by descending count, then key, so
    /// the output is deterministic.
    #[must_use]
    pub fn over(scope: &[Record]) -> Self {
        let by_family = grouped(scope.iter().filter_map(|r| r.family.as_deref()));
        let by_life_form = grouped(
            scope
                .iter()
                .filter_map(|r| r.morphology.life_form.map(|l| l.as_str())),
        );

        Self {
            total: scope.len(),
            by_family,
            by_life_form,
            mean_girth_cm: mean(scope.iter().filter_map(|r| r.morphology.girth_cm)),
            mean_height_m: mean(scope.iter().filter_map(|r| r.morphology.height_m)),
        }
    }
}

fn grouped<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<GroupCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount { key: key.to_string(), count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
