//! In-memory engine implementing the [`Store`] contract.

use crate::builder::MemoryStoreBuilder;
use crate::error::StoreError;
use crate::{Document, Store};
use census_domain::Model;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;
use tracing::trace;

const KEY_SEPARATOR: &str = ":";

/// The internal shared state of a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryStoreInner {
    pub(crate) keys: FxHashMap<Model, Vec<String>>,
    pub(crate) read_only: bool,
    pub(crate) tables: RwLock<FxHashMap<Model, BTreeMap<String, Document>>>,
}

/// A thread-safe in-memory store.
///
/// The handle is reference-counted and can be cheaply cloned into concurrent tasks.
/// Documents are kept per model in identity-key order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    pub(crate) inner: Arc<MemoryStoreInner>,
}

impl Deref for MemoryStore {
    type Target = MemoryStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl MemoryStore {
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    /// Identity key fields of `model`.
    #[must_use]
    pub fn key_fields(&self, model: Model) -> &[String] {
        self.keys.get(&model).map_or(&[], Vec::as_slice)
    }

    /// Computes the identity key of `document` for `model`.
    ///
    /// # Errors
    /// Returns [`StoreError::MissingKey`] if a key field is absent, empty, or not a
    /// string or number.
    pub fn identity(&self, model: Model, document: &Document) -> Result<String, StoreError> {
        let mut parts = Vec::with_capacity(self.key_fields(model).len());
        for field in self.key_fields(model) {
            let part = match document.get(field) {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(StoreError::MissingKey {
                        message: field.clone().into(),
                        context: Some(format!("{model} document").into()),
                    });
                },
            };
            parts.push(part);
        }
        Ok(parts.join(KEY_SEPARATOR))
    }

    /// All documents of `model`, ordered by identity key.
    #[must_use]
    pub fn documents(&self, model: Model) -> Vec<Document> {
        self.tables.read().get(&model).map(|t| t.values().cloned().collect()).unwrap_or_default()
    }

    /// Drops every document of every model.
    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

impl Store for MemoryStore {
    async fn find_by_id(&self, model: Model, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.tables.read().get(&model).and_then(|t| t.get(id)).cloned())
    }

    async fn count(&self, model: Model) -> Result<u64, StoreError> {
        let len = self.tables.read().get(&model).map_or(0, BTreeMap::len);
        Ok(len as u64)
    }

    async fn upsert(&self, model: Model, document: Document) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Rejected {
                message: "store is read-only".into(),
                context: Some(model.to_string().into()),
            });
        }
        let key = self.identity(model, &document)?;

        // Let sibling upserts of the same load interleave.
        tokio::task::yield_now().await;

        let replaced = self.tables.write().entry(model).or_default().insert(key.clone(), document);
        trace!(%model, %key, replaced = replaced.is_some(), "Upserted document");
        Ok(())
    }
}
