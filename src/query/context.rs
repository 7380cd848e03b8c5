//! Query execution context
//!
//! The `QueryContext` is an in-memory view of the numeric doc values a
//! query runs against, plus a filter cache shared by the nodes of one
//! execution.

use crate::models::DocumentId;
use crate::Result;
use parking_lot::RwLock;
use roaring::RoaringBitmap;
use std::collections::HashMap;
use std::sync::Arc;

/// Filter cache for reusing expensive filter computations
pub type FilterCache = Arc<RwLock<HashMap<String, RoaringBitmap>>>;

/// Query execution context providing access to numeric doc values
pub struct QueryContext {
    /// DocNo to Document ID mapping (dense position -> external ID)
    doc_ids: Arc<Vec<DocumentId>>,

    /// Numeric column per field, indexed by docno
    columns: Arc<HashMap<String, Vec<Option<f64>>>>,

    /// Tombstone bitmap (deleted documents)
    tombstones: Arc<RoaringBitmap>,

    /// Filter result cache (keyed by canonical filter representation)
    filter_cache: FilterCache,
}

impl QueryContext {
    /// Create a context builder
    pub fn builder() -> QueryContextBuilder {
        QueryContextBuilder::default()
    }

    /// Get total number of documents, tombstoned ones included
    pub fn total_docs(&self) -> usize {
        self.doc_ids.len()
    }

    /// Numeric value of `field` for a document
    pub fn value(&self, field: &str, docno: u32) -> Option<f64> {
        self.columns
            .get(field)
            .and_then(|column| column.get(docno as usize).copied().flatten())
    }

    /// Live documents whose `field` value satisfies `predicate`
    pub fn matching_docs<F>(&self, field: &str, predicate: F) -> RoaringBitmap
    where
        F: Fn(f64) -> bool,
    {
        let mut bitmap = RoaringBitmap::new();
        if let Some(column) = self.columns.get(field) {
            for (docno, value) in column.iter().enumerate() {
                if let Some(v) = value {
                    if predicate(*v) {
                        bitmap.insert(docno as u32);
                    }
                }
            }
        }
        bitmap -= self.tombstones.as_ref();
        bitmap
    }

    /// Every live document
    pub fn live_docs(&self) -> RoaringBitmap {
        let mut bitmap: RoaringBitmap = (0..self.total_docs() as u32).collect();
        bitmap -= self.tombstones.as_ref();
        bitmap
    }

    /// Get or compute a cached filter result
    pub fn get_or_cache_filter<F>(&self, cache_key: &str, compute: F) -> Result<RoaringBitmap>
    where
        F: FnOnce() -> Result<RoaringBitmap>,
    {
        if let Some(cached) = self.filter_cache.read().get(cache_key) {
            return Ok(cached.clone());
        }

        let result = compute()?;
        self.filter_cache
            .write()
            .insert(cache_key.to_string(), result.clone());
        Ok(result)
    }

    /// Check if a document is tombstoned (deleted)
    pub fn is_tombstoned(&self, docno: u32) -> bool {
        self.tombstones.contains(docno)
    }

    /// Get the tombstone bitmap
    pub fn tombstones(&self) -> &RoaringBitmap {
        &self.tombstones
    }

    /// Map internal docno to external document ID
    pub fn docno_to_doc_id(&self, docno: u32) -> Option<DocumentId> {
        self.doc_ids.get(docno as usize).copied()
    }
}

/// Builder for QueryContext
#[derive(Default)]
pub struct QueryContextBuilder {
    doc_ids: Vec<DocumentId>,
    columns: HashMap<String, Vec<Option<f64>>>,
    tombstones: RoaringBitmap,
}

impl QueryContextBuilder {
    /// Add a document with its numeric field values
    pub fn document<I, S>(mut self, doc_id: DocumentId, values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let docno = self.doc_ids.len();
        self.doc_ids.push(doc_id);

        for (field, value) in values {
            let column = self.columns.entry(field.into()).or_default();
            column.resize(docno + 1, None);
            column[docno] = Some(value);
        }
        self
    }

    /// Mark a previously added document as deleted
    pub fn delete(mut self, doc_id: DocumentId) -> Self {
        if let Some(docno) = self.doc_ids.iter().position(|&id| id == doc_id) {
            self.tombstones.insert(docno as u32);
        }
        self
    }

    /// Build the QueryContext
    pub fn build(mut self) -> QueryContext {
        let total = self.doc_ids.len();
        for column in self.columns.values_mut() {
            column.resize(total, None);
        }

        QueryContext {
            doc_ids: Arc::new(self.doc_ids),
            columns: Arc::new(self.columns),
            tombstones: Arc::new(self.tombstones),
            filter_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
