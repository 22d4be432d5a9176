//! The durable record collection.
//!
//! The whole collection lives as one JSON document under a fixed, versioned
//! key; every mutating call reads the document, rewrites it in memory and
//! persists it back in full. There is no cross-call atomicity: two callers
//! racing [`save_one`](RecordStore::save_one) against
//! [`remove_one`](RecordStore::remove_one) can lose one of the updates
//! (whole-collection last-writer-wins). This is an accepted tradeoff for a
//! single-user, single-session app; callers must await completion of one
//! mutating call before issuing the next.

use crate::core::merge::{self, MergeReport};
use crate::{Record, RecordDraft, Result, Storage};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::OptionalExtension;
use std::path::Path;

/// The fixed storage key the collection document lives under. The `v1`
/// suffix is the schema version tag; there is no migration mechanism, so new
/// optional record fields must tolerate absence in older documents.
pub const COLLECTION_KEY: &str = "nervura:records:v1";

/// The persistent, keyed collection of specimen records.
pub struct RecordStore {
    storage: Storage,
}

impl RecordStore {
    /// Creates a new store database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NervuraError::Database`] for any SQLite failure.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { storage: Storage::create(path)? })
    }

    /// Opens an existing store database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NervuraError::InvalidStore`] if the file is not a
    /// Nervura store, or [`crate::NervuraError::Database`] for any SQLite
    /// failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { storage: Storage::open(path)? })
    }

    /// In-memory store, used by tests and previews.
    pub fn in_memory() -> Result<Self> {
        Ok(Self { storage: Storage::in_memory()? })
    }

    /// Returns all records in insertion order.
    ///
    /// Data-shape problems never fail a read: a missing document, a document
    /// that is not a JSON array, or individually undecodable entries all
    /// degrade to an empty or partial list with a warning. Only a SQLite
    /// failure surfaces as an error.
    pub fn load_all(&self) -> Result<Vec<Record>> {
        let raw: Option<String> = self
            .storage
            .connection()
            .query_row(
                "SELECT value FROM collections WHERE key = ?",
                [COLLECTION_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Array(entries)) => entries,
            Ok(_) | Err(_) => {
                warn!("collection document under {COLLECTION_KEY} is malformed; treating as empty");
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let records: Vec<Record> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("dropping malformed record entry: {e}");
                    None
                }
            })
            .collect();
        if records.len() < total {
            warn!("kept {} of {} persisted records", records.len(), total);
        }
        Ok(records)
    }

    /// Inserts or replaces one record by id.
    ///
    /// An existing record is replaced field-for-field by `record`, except that
    /// the original `created_at` is preserved; a new record is appended with
    /// its own `created_at`. Either way `updated_at` is stamped with the
    /// current time. Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NervuraError::Database`] or [`crate::NervuraError::Json`]
    /// if the rewritten collection cannot be persisted.
    pub fn save_one(&mut self, mut record: Record) -> Result<Record> {
        let mut all = self.load_all()?;
        let now = Utc::now();
        record.updated_at = now;

        if let Some(existing) = all.iter_mut().find(|r| r.id == record.id) {
            record.created_at = existing.created_at;
            *existing = record.clone();
        } else {
            all.push(record.clone());
        }

        self.persist(&all)?;
        debug!("saved record {}", record.id);
        Ok(record)
    }

    /// Fetches one record by id. Pure read.
    pub fn get_one(&self, id: &str) -> Result<Option<Record>> {
        Ok(self.load_all()?.into_iter().find(|r| r.id == id))
    }

    /// Removes one record by id. Removing an unknown id is not an error.
    pub fn remove_one(&mut self, id: &str) -> Result<()> {
        let mut all = self.load_all()?;
        all.retain(|r| r.id != id);
        self.persist(&all)
    }

    /// Clears the whole collection.
    pub fn wipe_all(&mut self) -> Result<()> {
        self.persist(&[])
    }

    /// Reconciles a batch of candidate drafts against the store in one pass.
    ///
    /// See [`merge::reconcile`] for the field-level merge semantics. Drafts
    /// without an id are skipped, counted in the returned report and logged —
    /// never an error.
    pub fn upsert_many(
        &mut self,
        incoming: &[RecordDraft],
        prefer_new_fields: bool,
    ) -> Result<MergeReport> {
        if incoming.is_empty() {
            return Ok(MergeReport::default());
        }
        let existing = self.load_all()?;
        let (reconciled, report) = merge::reconcile(existing, incoming, prefer_new_fields, Utc::now());
        self.persist(&reconciled)?;
        debug!(
            "upsert batch: {} inserted, {} updated, {} skipped",
            report.inserted, report.updated, report.skipped
        );
        Ok(report)
    }

    fn persist(&mut self, records: &[Record]) -> Result<()> {
        let doc = serde_json::to_string(records)?;
        self.storage.connection().execute(
            "INSERT INTO collections (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [COLLECTION_KEY, &doc],
        )?;
        Ok(())
    }
}
