//! GeoJSON serializer (RFC 7946).
//!
//! One Point feature per positioned record, coordinates in `[lng, lat]`
//! order. Records without a position are excluded from `features` — they are
//! not an error, they just have nowhere to go on a map.

use crate::{Morphology, Record, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Foreign member (RFC 7946 §6.1): size of the exported scope, including
    /// records that had no position and therefore produced no feature.
    record_count: usize,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Geometry,
    properties: Properties<'a>,
}

#[derive(Serialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: &'static str,
    /// `[lng, lat]` — GeoJSON axis order, not the `{lat, lng}` the rest of
    /// the app uses.
    coordinates: [f64; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Properties<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    common_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scientific_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    family: Option<&'a str>,
    morphology: &'a Morphology,
    photos: Vec<&'a str>,
    photo_count: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub fn render(records: &[Record]) -> Result<String> {
    let features: Vec<Feature> = records
        .iter()
        .filter_map(|record| {
            let position = record.position?;
            Some(Feature {
                kind: "Feature",
                geometry: Geometry {
                    kind: "Point",
                    coordinates: [position.lng, position.lat],
                },
                properties: Properties {
                    id: &record.id,
                    common_name: record.common_name.as_deref(),
                    scientific_name: record.scientific_name.as_deref(),
                    family: record.family.as_deref(),
                    morphology: &record.morphology,
                    photos: record.photos.iter().map(|p| p.uri.as_str()).collect(),
                    photo_count: record.photos.len(),
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                },
            })
        })
        .collect();

    let collection = FeatureCollection {
        kind: "FeatureCollection",
        record_count: records.len(),
        features,
    };
    Ok(serde_json::to_string(&collection)?)
}
