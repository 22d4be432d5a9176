//! Batch reconciliation behind [`RecordStore::upsert_many`].
//!
//! [`reconcile`] is a pure function over an in-memory collection so the merge
//! policy can be tested without a database. The policy deliberately never
//! rejects a batch over bad entries: a draft without an id, or an entry that
//! does not decode, is skipped, counted in the [`MergeReport`] and logged at
//! warn level. Callers surface the report, not an error.
//!
//! [`RecordStore::upsert_many`]: crate::RecordStore::upsert_many

use crate::{Record, RecordDraft};
use chrono::{DateTime, Utc};
use log::warn;
use std::collections::HashMap;

/// Counts returned by a batch reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Drafts that had no existing match and were inserted as new records.
    pub inserted: usize,
    /// Drafts merged into an existing record.
    pub updated: usize,
    /// Drafts dropped because they carried no id or did not decode.
    pub skipped: usize,
}

/// Reconciles `incoming` drafts against `existing`, returning the new
/// collection and a report of what happened.
///
/// Per-draft semantics:
///
/// - no id → skipped;
/// - no existing match → inserted as a new record (`created_at` from the
///   draft or `now`);
/// - existing match → merged, with the existing record as base:
///   - when `prefer_new_fields`, top-level scalar fields set on the draft
///     overwrite the existing values; otherwise incoming scalars are ignored;
///   - morphology is merged key-by-key (incoming keys win, absent keys are
///     preserved) regardless of the flag;
///   - photos are replaced only by a non-empty incoming list — a record never
///     silently loses its photos because a later batch omitted them;
///   - `created_at` is never touched; `updated_at` is stamped with `now`.
///
/// Existing records keep their relative order; new records are appended in
/// batch order.
pub fn reconcile(
    existing: Vec<Record>,
    incoming: &[RecordDraft],
    prefer_new_fields: bool,
    now: DateTime<Utc>,
) -> (Vec<Record>, MergeReport) {
    let mut result = existing;
    let mut index: HashMap<String, usize> = result
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.clone(), i))
        .collect();
    let mut report = MergeReport::default();

    for draft in incoming {
        let Some(id) = draft.id.as_deref() else {
            warn!("skipping batch entry without id");
            report.skipped += 1;
            continue;
        };

        match index.get(id) {
            Some(&i) => {
                merge_into(&mut result[i], draft, prefer_new_fields, now);
                report.updated += 1;
            }
            None => {
                let record = draft.clone().assemble(now);
                index.insert(record.id.clone(), result.len());
                result.push(record);
                report.inserted += 1;
            }
        }
    }

    (result, report)
}

/// Applies one draft onto an existing record in place.
fn merge_into(base: &mut Record, draft: &RecordDraft, prefer_new_fields: bool, now: DateTime<Utc>) {
    if prefer_new_fields {
        if draft.position.is_some() {
            base.position = draft.position;
        }
        if draft.common_name.is_some() {
            base.common_name = draft.common_name.clone();
        }
        if draft.scientific_name.is_some() {
            base.scientific_name = draft.scientific_name.clone();
        }
        if draft.family.is_some() {
            base.family = draft.family.clone();
        }
    }
    if let Some(morphology) = &draft.morphology {
        base.morphology.merge_from(morphology);
    }
    if let Some(photos) = &draft.photos {
        if !photos.is_empty() {
            base.photos = photos.clone();
        }
    }
    base.updated_at = now;
}

/// Decodes a JSON array of candidate drafts element by element, so one
/// malformed entry does not reject the whole batch. Returns the decodable
/// drafts and the number of entries dropped.
///
/// # Errors
///
/// Returns [`crate::NervuraError::Json`] only when `json` is not a JSON array
/// at all.
pub fn parse_batch(json: &str) -> crate::Result<(Vec<RecordDraft>, usize)> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = entries.len();
    let drafts: Vec<RecordDraft> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("dropping malformed batch entry: {e}");
                None
            }
        })
        .collect();
    let dropped = total - drafts.len();
    Ok((drafts, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatLng, LifeForm, Morphology, PhotoRef};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn existing_ipe() -> Record {
        RecordDraft {
            id: Some("r1".to_string()),
            position: Some(LatLng { lat: -22.7, lng: -43.6 }),
            common_name: Some("Ipê".to_string()),
            created_at: Some(ts("2024-01-01T00:00:00Z")),
            photos: Some(vec![PhotoRef {
                uri: "file:///habito.jpg".to_string(),
                name: None,
                caption: Some("hábito".to_string()),
                captured_at: None,
                gps: None,
            }]),
            ..Default::default()
        }
        .assemble(ts("2024-01-01T00:00:00Z"))
    }

    #[test]
    fn test_reconcile_merges_scalars_morphology_and_keeps_photos() {
        let now = ts("2024-02-02T00:00:00Z");
        let incoming = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Ipê-amarelo".to_string()),
            morphology: Some(Morphology {
                life_form: Some(LifeForm::Arvore),
                ..Default::default()
            }),
            photos: Some(vec![]),
            ..Default::default()
        }];

        let (result, report) = reconcile(vec![existing_ipe()], &incoming, true, now);

        assert_eq!(report, MergeReport { inserted: 0, updated: 1, skipped: 0 });
        let r = &result[0];
        assert_eq!(r.common_name.as_deref(), Some("Ipê-amarelo"));
        assert_eq!(r.morphology.life_form, Some(LifeForm::Arvore));
        assert_eq!(r.photos.len(), 1, "empty incoming photos must not wipe existing ones");
        assert_eq!(r.created_at, ts("2024-01-01T00:00:00Z"));
        assert_eq!(r.updated_at, now);
        assert_eq!(r.position, Some(LatLng { lat: -22.7, lng: -43.6 }));
    }

    #[test]
    fn test_reconcile_morphology_union_preserves_absent_keys() {
        let now = ts("2024-02-02T00:00:00Z");
        let mut base = existing_ipe();
        base.morphology.leaf_type = Some("composta".to_string());
        base.morphology.girth_cm = Some(45.0);

        let incoming = vec![RecordDraft {
            id: Some("r1".to_string()),
            morphology: Some(Morphology {
                girth_cm: Some(50.0),
                ..Default::default()
            }),
            ..Default::default()
        }];

        let (result, _) = reconcile(vec![base], &incoming, true, now);
        assert_eq!(result[0].morphology.girth_cm, Some(50.0));
        assert_eq!(result[0].morphology.leaf_type.as_deref(), Some("composta"));
    }

    #[test]
    fn test_reconcile_without_prefer_new_fields_keeps_existing_scalars() {
        let now = ts("2024-02-02T00:00:00Z");
        let incoming = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Outro nome".to_string()),
            morphology: Some(Morphology {
                life_form: Some(LifeForm::Arvore),
                ..Default::default()
            }),
            ..Default::default()
        }];

        let (result, _) = reconcile(vec![existing_ipe()], &incoming, false, now);
        assert_eq!(result[0].common_name.as_deref(), Some("Ipê"));
        // Composite merges still apply.
        assert_eq!(result[0].morphology.life_form, Some(LifeForm::Arvore));
    }

    #[test]
    fn test_reconcile_inserts_new_and_skips_idless() {
        let now = ts("2024-02-02T00:00:00Z");
        let incoming = vec![
            RecordDraft {
                id: Some("r2".to_string()),
                common_name: Some("Pau-brasil".to_string()),
                ..Default::default()
            },
            RecordDraft {
                common_name: Some("sem id".to_string()),
                ..Default::default()
            },
        ];

        let (result, report) = reconcile(vec![existing_ipe()], &incoming, true, now);
        assert_eq!(report, MergeReport { inserted: 1, updated: 0, skipped: 1 });
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].id, "r2");
        assert_eq!(result[1].created_at, now);
    }

    #[test]
    fn test_reconcile_new_record_keeps_incoming_created_at() {
        let now = ts("2024-02-02T00:00:00Z");
        let incoming = vec![RecordDraft {
            id: Some("r2".to_string()),
            created_at: Some(ts("2023-05-05T00:00:00Z")),
            ..Default::default()
        }];

        let (result, _) = reconcile(vec![], &incoming, true, now);
        assert_eq!(result[0].created_at, ts("2023-05-05T00:00:00Z"));
        assert_eq!(result[0].updated_at, now);
    }

    #[test]
    fn test_later_duplicate_in_batch_wins() {
        let now = ts("2024-02-02T00:00:00Z");
        let incoming = vec![
            RecordDraft {
                id: Some("r9".to_string()),
                common_name: Some("primeiro".to_string()),
                ..Default::default()
            },
            RecordDraft {
                id: Some("r9".to_string()),
                common_name: Some("segundo".to_string()),
                ..Default::default()
            },
        ];

        let (result, report) = reconcile(vec![], &incoming, true, now);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].common_name.as_deref(), Some("segundo"));
        assert_eq!(report.inserted, 1);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn test_parse_batch_drops_malformed_entries() {
        let json = r#"[{"id":"r1"},"not an object",{"id":"r2","position":{"lat":-22.7,"lng":-43.6}}]"#;
        let (drafts, dropped) = parse_batch(json).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(dropped, 1);

        assert!(parse_batch("{\"id\":\"r1\"}").is_err());
    }

    // The end-to-end scenario from the app's import round-trip.
    #[test]
    fn test_upsert_scenario_over_store() {
        let mut store = crate::RecordStore::in_memory().unwrap();
        let mut rec = existing_ipe();
        rec.created_at = ts("2024-01-01T00:00:00Z");
        store.save_one(rec).unwrap();

        let incoming = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Ipê-amarelo".to_string()),
            morphology: Some(Morphology {
                life_form: Some(LifeForm::Arvore),
                ..Default::default()
            }),
            photos: Some(vec![]),
            ..Default::default()
        }];
        let report = store.upsert_many(&incoming, true).unwrap();
        assert_eq!(report.updated, 1);

        let r = store.get_one("r1").unwrap().unwrap();
        assert_eq!(r.common_name.as_deref(), Some("Ipê-amarelo"));
        assert_eq!(r.morphology.life_form, Some(LifeForm::Arvore));
        assert_eq!(r.photos.len(), 1);
        assert_eq!(r.created_at, ts("2024-01-01T00:00:00Z"));
        assert!(r.updated_at > r.created_at);
    }
}
