//! Genus→family lookup used to pre-populate the family field.
//!
//! The index is an explicit object built once at startup and passed to
//! whoever needs it — there is no implicit module-level cache. It only ever
//! suggests a value; user input is never validated or rejected against it.

use crate::Result;
use std::collections::HashMap;

/// Static genus→family lookup table.
pub struct GenusFamilyIndex {
    table: HashMap<String, String>,
}

impl GenusFamilyIndex {
    /// Builds the index from the table bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NervuraError::Json`] if the bundled table is invalid,
    /// which would be a packaging defect.
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("genus2family.json"))
    }

    /// Builds the index from a caller-supplied `{ "genus": "Family" }` table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NervuraError::Json`] when `json` is not a string map.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let table = raw
            .into_iter()
            .map(|(genus, family)| (genus.to_lowercase(), family))
            .collect();
        Ok(Self { table })
    }

    /// Suggests a family for a scientific name by looking up its first
    /// whitespace-separated token (the genus), case-insensitively.
    #[must_use]
    pub fn guess_family(&self, scientific_name: &str) -> Option<&str> {
        let genus = scientific_name.split_whitespace().next()?;
        self.table.get(&genus.to_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
