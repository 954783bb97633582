//! # Store
//!
//! The persistence contract the census loader writes through, plus an in-memory
//! engine implementing it.
//!
//! Every model exposes three operations: look a document up by its identity key,
//! count documents, and upsert a document (insert or replace as a whole). Documents
//! are JSON objects; which fields form the identity key is a property of the engine.
//!
//! ## Example
//!
//! ```rust
//! use census_domain::Model;
//! use census_store::{MemoryStore, Store, StoreError};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StoreError> {
//!     let store = MemoryStore::builder().build();
//!
//!     let doc = json!({ "id": "gb", "settings": { "title": "UK Census" } });
//!     store.upsert(Model::Site, census_store::document(&doc)?).await?;
//!
//!     assert!(store.find_by_id(Model::Site, "gb").await?.is_some());
//!     assert_eq!(store.count(Model::Site).await?, 1);
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod memory;

pub use builder::MemoryStoreBuilder;
pub use error::{StoreError, StoreErrorExt};
pub use memory::MemoryStore;

use census_domain::Model;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;

/// A stored document: a JSON object including the model's identity key fields.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Persistence contract used by the loader.
///
/// Implementations must be shareable across the concurrent upsert tasks of one load.
pub trait Store: Send + Sync + 'static {
    /// Looks up a document by identity key. Composite keys are joined with `:`.
    fn find_by_id(
        &self,
        model: Model,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;

    /// Number of documents stored for `model`.
    fn count(&self, model: Model) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Inserts `document`, or replaces the document with the same identity key.
    fn upsert(
        &self,
        model: Model,
        document: Document,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Converts a serializable value into a [`Document`].
///
/// # Errors
/// Returns [`StoreError::Document`] if serialization fails and
/// [`StoreError::Internal`] if the value is not a JSON object.
pub fn document<T: Serialize + ?Sized>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value).context("Serializing document")? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Internal {
            message: format!("expected a JSON object, got {other}").into(),
            context: Some("Serializing document".into()),
        }),
    }
}

/// Converts a stored [`Document`] back into a typed value.
///
/// # Errors
/// Returns [`StoreError::Document`] if the document does not match `T`.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(document)).context("Deserializing document")
}
