//! The core record entity and its building blocks.
//!
//! A [`Record`] is one observed specimen: an optional map position, naming
//! fields, a [`Morphology`] descriptor bag, an ordered photo list and a pair of
//! timestamps. Records are assembled from a [`RecordDraft`] — the all-optional
//! shape produced by the collection form or received in an import batch — and
//! persisted through [`RecordStore`](crate::RecordStore).
//!
//! All types serialize in camelCase, matching the persisted JSON document and
//! every other externally-visible type in this project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Formats the position as `"lat, lng"` with six decimal places,
    /// the precision shown throughout the app.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// The life form of a specimen, serialized as the Portuguese tag the
/// collection form uses. Unknown tags in older or foreign data degrade to
/// [`LifeForm::Outra`] rather than failing the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeForm {
    #[serde(rename = "árvore")]
    Arvore,
    #[serde(rename = "arbusto")]
    Arbusto,
    #[serde(rename = "erva")]
    Erva,
    #[serde(rename = "cipó")]
    Cipo,
    #[serde(rename = "epífita")]
    Epifita,
    #[serde(rename = "palmeira")]
    Palmeira,
    #[serde(rename = "liana")]
    Liana,
    #[serde(rename = "outra", other)]
    Outra,
}

impl LifeForm {
    /// The serialized tag, for display and grouping.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arvore => "árvore",
            Self::Arbusto => "arbusto",
            Self::Erva => "erva",
            Self::Cipo => "cipó",
            Self::Epifita => "epífita",
            Self::Palmeira => "palmeira",
            Self::Liana => "liana",
            Self::Outra => "outra",
        }
    }
}

impl std::fmt::Display for LifeForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to one captured photo.
///
/// The store never owns the underlying bytes: `uri` points into the hosting
/// platform's transient file area and is not guaranteed to survive a process
/// restart. `captured_at` and `gps` carry embedded metadata when the photo
/// provider extracted any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free caption tag ("folha", "flor", "casca", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<LatLng>,
}

/// The botanical descriptor bag attached to a record.
///
/// This is a closed set of optional fields plus a reserved string-to-string
/// `extra` map for forward compatibility; new descriptors become named fields,
/// not ad-hoc keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Morphology {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_form: Option<LifeForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flowers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fruits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf_margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phyllotaxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bark: Option<String>,
    /// Trunk circumference at breast height, in centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub girth_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Reserved extension map for fields this version does not know about.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Morphology {
    /// Key-level union merge: every field present on `incoming` overwrites the
    /// same-named field here; fields absent from `incoming` are preserved.
    pub fn merge_from(&mut self, incoming: &Morphology) {
        macro_rules! take {
            ($field:ident) => {
                if incoming.$field.is_some() {
                    self.$field = incoming.$field.clone();
                }
            };
        }
        take!(life_form);
        take!(flowers);
        take!(fruits);
        take!(health);
        take!(leaf_type);
        take!(leaf_margin);
        take!(phyllotaxy);
        take!(venation);
        take!(bark);
        take!(girth_cm);
        take!(height_m);
        take!(notes);
        for (k, v) in &incoming.extra {
            self.extra.insert(k.clone(), v.clone());
        }
    }

    /// True when no descriptor at all has been filled in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Morphology::default()
    }
}

/// One observed specimen entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    /// Absent while a sensor fix is still pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Morphology::is_empty")]
    pub morphology: Morphology,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<PhotoRef>,
    /// Set once at first save and never changed afterwards.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating operation.
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// The record's display title: common name, else scientific name, else id.
    #[must_use]
    pub fn title(&self) -> &str {
        self.common_name
            .as_deref()
            .or(self.scientific_name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Multi-line human summary handed to the platform share sheet.
    #[must_use]
    pub fn share_text(&self) -> String {
        let mut lines = vec!["Registro botânico (NervuraColetora)".to_string(), String::new()];
        if let Some(name) = &self.common_name {
            lines.push(format!("Nome popular: {name}"));
        }
        if let Some(name) = &self.scientific_name {
            lines.push(format!("Nome científico: {name}"));
        }
        if let Some(family) = &self.family {
            lines.push(format!("Família: {family}"));
        }
        if let Some(pos) = &self.position {
            lines.push(format!("Local: {}", pos.display()));
        }
        lines.push(format!("Data: {}", self.created_at.to_rfc3339()));
        if let Some(life) = &self.morphology.life_form {
            lines.push(format!("Forma de vida: {life}"));
        }
        if let Some(notes) = &self.morphology.notes {
            lines.push(format!("Anotações: {notes}"));
        }
        lines.join("\n")
    }
}

/// The all-optional candidate shape assembled by the collection form or
/// decoded from an import batch. Turned into a [`Record`] by [`assemble`]
/// (first save) or reconciled against an existing record by the merge engine.
///
/// [`assemble`]: RecordDraft::assemble
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordDraft {
    pub id: Option<String>,
    pub position: Option<LatLng>,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub morphology: Option<Morphology>,
    pub photos: Option<Vec<PhotoRef>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl RecordDraft {
    /// Builds a full [`Record`] from this draft.
    ///
    /// A fresh UUID is assigned when the draft carries no id. `created_at`
    /// comes from the draft when explicitly set, else from the first photo's
    /// embedded capture time, else from `now`; it will not change again.
    #[must_use]
    pub fn assemble(self, now: DateTime<Utc>) -> Record {
        let created_at = self
            .created_at
            .or_else(|| self.photos.as_deref().and_then(first_capture_time))
            .unwrap_or(now);
        Record {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            position: self.position,
            common_name: self.common_name,
            scientific_name: self.scientific_name,
            family: self.family,
            morphology: self.morphology.unwrap_or_default(),
            photos: self.photos.unwrap_or_default(),
            created_at,
            updated_at: now,
        }
    }
}

/// Capture time of the first photo that has one embedded.
#[must_use]
pub fn first_capture_time(photos: &[PhotoRef]) -> Option<DateTime<Utc>> {
    photos.iter().find_map(|p| p.captured_at)
}
