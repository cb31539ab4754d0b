//! Feature schema: the ordered column layout the model was trained on.
//!
//! Columns 0..3 are the numeric inputs (`total_sqft`, `bath`, `bhk`), every
//! column after that is a one-hot location slot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of leading numeric columns before the location columns start
pub const NUMERIC_COLUMNS: usize = 3;

pub const SQFT_INDEX: usize = 0;
pub const BATH_INDEX: usize = 1;
pub const BHK_INDEX: usize = 2;

/// On-disk shape of the schema document (`columns.json`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaDocument {
    pub data_columns: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema has {found} columns, expected at least 3 (total_sqft, bath, bhk)")]
    TooFewColumns { found: usize },
    #[error("duplicate location column '{0}'")]
    DuplicateLocation(String),
}

/// Ordered feature columns, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from raw column names, validating the fixed layout
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.len() < NUMERIC_COLUMNS {
            return Err(SchemaError::TooFewColumns {
                found: columns.len(),
            });
        }

        let mut seen = HashSet::new();
        for location in &columns[NUMERIC_COLUMNS..] {
            if !seen.insert(location.as_str()) {
                return Err(SchemaError::DuplicateLocation(location.clone()));
            }
        }

        Ok(Self { columns })
    }

    pub fn from_document(document: SchemaDocument) -> Result<Self, SchemaError> {
        Self::new(document.data_columns)
    }

    /// All columns, in model order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Location columns (everything after the numeric columns), in file order
    pub fn locations(&self) -> &[String] {
        &self.columns[NUMERIC_COLUMNS..]
    }

    /// Case-insensitive lookup of a location's one-hot column index.
    ///
    /// Only location columns are searched, so a request for "bath" never
    /// lands on a numeric slot.
    pub fn location_index(&self, location: &str) -> Option<usize> {
        let needle = location.to_lowercase();
        self.locations()
            .iter()
            .position(|column| *column == needle)
            .map(|offset| offset + NUMERIC_COLUMNS)
    }
}
