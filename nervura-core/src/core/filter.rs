//! Scope selection for exports and analytics.
//!
//! A [`RecordFilter`] is the caller-side filter predicate: exports and
//! analytics always consume the filtered scope it produces, never the raw
//! store, so serialization stays decoupled from filtering policy.

use crate::{LifeForm, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The active filter predicate over the record collection.
///
/// All criteria are optional and combined with AND; the default filter
/// selects everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordFilter {
    /// Exact family name, compared case-insensitively.
    pub family: Option<String>,
    pub life_form: Option<LifeForm>,
    /// Case-insensitive substring over common name, scientific name and family.
    pub query: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    pub has_photo: Option<bool>,
}

impl RecordFilter {
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(family) = &self.family {
            let matches = record
                .family
                .as_deref()
                .is_some_and(|f| f.eq_ignore_ascii_case(family));
            if !matches {
                return false;
            }
        }
        if let Some(life_form) = self.life_form {
            if record.morphology.life_form != Some(life_form) {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            if !needle.trim().is_empty() {
                let hit = [&record.common_name, &record.scientific_name, &record.family]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }
        if let Some(from) = self.from {
            if record.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.created_at > to {
                return false;
            }
        }
        if let Some(has_photo) = self.has_photo {
            if record.photos.is_empty() == has_photo {
                return false;
            }
        }
        true
    }

    /// The scope this filter selects, preserving collection order.
    #[must_use]
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
