//! Core library for Nervura Coletora — a local-first botanical field-collection app.
//!
//! The primary entry point is [`RecordStore`], the durable keyed collection of
//! specimen [`Record`]s. Batch reconciliation goes through
//! [`RecordStore::upsert_many`]; a filtered scope (see [`RecordFilter`]) feeds
//! the [`export`] serializers and the [`Analysis`] aggregator. Map rendering,
//! camera capture, sensor polling and artifact delivery live in the hosting
//! shell, which talks to this crate through the types re-exported here and
//! the traits in [`capture`](core::capture).
//!
//! Store operations rewrite the whole collection per call and offer no
//! cross-call atomicity; see [`RecordStore`] for the exact semantics.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    analytics::{Analysis, GroupCount},
    capture::{
        position_or_fallback, PhotoMetadata, PhotoMetadataReader, PositionError,
        PositionProvider, DEFAULT_POSITION,
    },
    error::{NervuraError, Result},
    export::{export, Artifact, Cell, ExportContext, ExportFormat, COLUMNS},
    filter::RecordFilter,
    merge::{parse_batch, reconcile, MergeReport},
    record::{first_capture_time, LatLng, LifeForm, Morphology, PhotoRef, Record, RecordDraft},
    storage::Storage,
    store::{RecordStore, COLLECTION_KEY},
    taxonomy::GenusFamilyIndex,
};
