//! Book Catalog
//!
//! Keyed store of the books on the shelf and where each one sits on the
//! reference photo. Records keep their insertion order, which the matcher
//! relies on to break ties deterministically.

pub mod matcher;
mod seed;

pub use matcher::{clean_query, normalize_query, BookMatch, MatchRule};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{LocatorError, Result};
use crate::geometry::{NormBox, NormPoint, Quad, Region};

/// A book on the shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Normalized lowercase lookup key
    pub key: String,
    /// Display name as printed on the book
    #[serde(rename = "full_name")]
    pub name: String,
    /// Shelf row (0 = top)
    #[serde(default)]
    pub shelf: u8,
    /// Axis-aligned box used for coarse lookups
    pub position: NormBox,
    /// Optional quadrilateral outline, authoritative for rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Quad>,
}

impl BookRecord {
    /// Create a record from a region
    ///
    /// A quad region also fills in the box as its bounding box.
    pub fn new(key: &str, name: &str, shelf: u8, region: Region) -> Self {
        let (position, points) = match region {
            Region::Box(b) => (b, None),
            Region::Quad(q) => (q.bounding_box(), Some(q)),
        };
        Self {
            key: normalize_key(key),
            name: name.to_string(),
            shelf,
            position,
            points,
        }
    }

    /// Region to highlight: the quad when present, the box otherwise
    pub fn render_region(&self) -> Region {
        match self.points {
            Some(q) => Region::Quad(q),
            None => Region::Box(self.position),
        }
    }

    /// Check the stored geometry
    pub fn validate(&self) -> Result<()> {
        self.position.validate()?;
        if let Some(q) = &self.points {
            q.validate()?;
        }
        Ok(())
    }
}

/// Partial update of a book record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub name: Option<String>,
    pub shelf: Option<u8>,
    /// New box; clears any stored quad
    pub position: Option<NormBox>,
    /// New quad; the box is recomputed from it
    pub points: Option<Quad>,
}

impl BookUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.shelf.is_none()
            && self.position.is_none()
            && self.points.is_none()
    }
}

/// Normalize a catalog key: lowercase, trimmed, single spaces
pub fn normalize_key(key: &str) -> String {
    normalize_query(key)
}

/// In-memory book catalog with insertion-ordered iteration
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<BookRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, rejecting duplicate keys
    pub fn from_records(records: impl IntoIterator<Item = BookRecord>) -> Result<Self> {
        let mut catalog = Self::new();
        for record in records {
            catalog.add(record)?;
        }
        Ok(catalog)
    }

    /// The shelf as originally photographed
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for book in seed::SEED_BOOKS {
            let points = book
                .points
                .map(|pts| Quad::new(pts.map(NormPoint::from)));
            catalog.push(BookRecord {
                key: book.key.to_string(),
                name: book.name.to_string(),
                shelf: book.shelf,
                position: NormBox::from(book.position),
                points,
            });
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by key (the key is normalized first)
    pub fn get(&self, key: &str) -> Option<&BookRecord> {
        self.index
            .get(&normalize_key(key))
            .map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &BookRecord> {
        self.records.iter()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.key.as_str())
    }

    /// Add a new record
    ///
    /// Fails without touching the catalog when the key is empty or taken,
    /// or when the record's geometry is invalid.
    pub fn add(&mut self, mut record: BookRecord) -> Result<()> {
        record.key = normalize_key(&record.key);
        if record.key.is_empty() {
            return Err(LocatorError::EmptyKey);
        }
        if self.index.contains_key(&record.key) {
            return Err(LocatorError::DuplicateBook(record.key));
        }
        record.validate()?;

        info!("Adding book '{}' (shelf {})", record.key, record.shelf);
        self.push(record);
        Ok(())
    }

    /// Apply a partial update to an existing record
    ///
    /// Returns the updated record. The catalog is unchanged on error.
    pub fn update(&mut self, key: &str, update: BookUpdate) -> Result<&BookRecord> {
        let key = normalize_key(key);
        let idx = *self
            .index
            .get(&key)
            .ok_or_else(|| LocatorError::UnknownBook(key.clone()))?;

        let mut updated = self.records[idx].clone();
        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(shelf) = update.shelf {
            updated.shelf = shelf;
        }
        if let Some(position) = update.position {
            updated.position = position;
            updated.points = None;
        }
        if let Some(points) = update.points {
            updated.position = points.bounding_box();
            updated.points = Some(points);
        }
        updated.validate()?;

        debug!("Updated book '{}': {:?}", key, updated);
        self.records[idx] = updated;
        Ok(&self.records[idx])
    }

    /// Remove a record by key
    pub fn remove(&mut self, key: &str) -> Result<BookRecord> {
        let key = normalize_key(key);
        let idx = self
            .index
            .remove(&key)
            .ok_or(LocatorError::UnknownBook(key))?;

        let removed = self.records.remove(idx);
        self.reindex();
        info!("Removed book '{}'", removed.key);
        Ok(removed)
    }

    /// Append a record whose key is known to be unique
    fn push(&mut self, record: BookRecord) {
        self.index.insert(record.key.clone(), self.records.len());
        self.records.push(record);
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.key.clone(), idx))
            .collect();
    }
}
