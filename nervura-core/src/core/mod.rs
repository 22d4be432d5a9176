//! Internal domain modules for the Nervura core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod analytics;
pub mod capture;
pub mod error;
pub mod export;
pub mod filter;
pub mod merge;
pub mod record;
pub mod storage;
pub mod store;
pub mod taxonomy;

#[doc(inline)]
pub use analytics::{Analysis, GroupCount};
#[doc(inline)]
pub use capture::{
    position_or_fallback, PhotoMetadata, PhotoMetadataReader, PositionError, PositionProvider,
    DEFAULT_POSITION,
};
#[doc(inline)]
pub use error::{NervuraError, Result};
#[doc(inline)]
pub use export::{export, Artifact, Cell, ExportContext, ExportFormat, COLUMNS};
#[doc(inline)]
pub use filter::RecordFilter;
#[doc(inline)]
pub use merge::{parse_batch, reconcile, MergeReport};
#[doc(inline)]
pub use record::{first_capture_time, LatLng, LifeForm, Morphology, PhotoRef, Record, RecordDraft};
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use store::{RecordStore, COLLECTION_KEY};
#[doc(inline)]
pub use taxonomy::GenusFamilyIndex;
