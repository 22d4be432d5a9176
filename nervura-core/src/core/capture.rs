//! Interfaces to the sensors and photo pipeline the core consumes.
//!
//! The core never talks to hardware: the hosting shell implements these traits
//! over the platform geolocation and file APIs. Every failure here falls back
//! to a usable value — a missing fix or unreadable photo metadata must never
//! block the save path.

use crate::{LatLng, PhotoRef};
use chrono::{DateTime, Utc};
use log::warn;
use thiserror::Error;

/// Position used when no fix and no last-known position is available
/// (the UFRRJ Seropédica campus, where collection started).
pub const DEFAULT_POSITION: LatLng = LatLng { lat: -22.7603, lng: -43.6804 };

/// Why a position reading could not be produced.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("no position fix available")]
    Unavailable,
}

/// A source of geolocation readings.
pub trait PositionProvider {
    /// Returns the current position, or an error when no fix is available.
    fn current_position(&mut self) -> std::result::Result<LatLng, PositionError>;
}

/// Metadata embedded in a captured photo, when the platform could extract any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhotoMetadata {
    pub captured_at: Option<DateTime<Utc>>,
    pub gps: Option<LatLng>,
}

/// Reads embedded metadata out of a photo handle.
///
/// Implementations return `None` for any photo they cannot parse; extraction
/// failure is not an error.
pub trait PhotoMetadataReader {
    fn metadata(&self, photo: &PhotoRef) -> Option<PhotoMetadata>;
}

/// Resolves a position for a new draft: current fix, else `last_known`,
/// else [`DEFAULT_POSITION`].
pub fn position_or_fallback(
    provider: &mut dyn PositionProvider,
    last_known: Option<LatLng>,
) -> LatLng {
    match provider.current_position() {
        Ok(position) => position,
        Err(e) => {
            warn!("position unavailable ({e}); using fallback");
            last_known.unwrap_or(DEFAULT_POSITION)
        }
    }
}
