use crate::memory::{MemoryStore, MemoryStoreInner};
use census_domain::Model;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

const ID_KEY: &[&str] = &["id"];
const SITE_SCOPED_KEY: &[&str] = &["site", "id"];

/// A fluent builder for a [`MemoryStore`].
///
/// Registry entries, sites and users are keyed by `id`; every site-scoped model
/// is keyed by (`site`, `id`) unless overridden with [`MemoryStoreBuilder::key`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    keys: FxHashMap<Model, Vec<String>>,
    read_only: bool,
}

impl MemoryStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity key fields of `model`, in order.
    pub fn key<I, S>(mut self, model: Model, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.insert(model, fields.into_iter().map(Into::into).collect());
        self
    }

    /// Rejects every upsert, mirroring the `readonly` application mode.
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn build(self) -> MemoryStore {
        let mut keys = self.keys;
        for model in Model::all() {
            keys.entry(model).or_insert_with(|| {
                let default = if model.is_site_scoped() { SITE_SCOPED_KEY } else { ID_KEY };
                default.iter().map(|f| (*f).to_owned()).collect()
            });
        }

        MemoryStore {
            inner: Arc::new(MemoryStoreInner {
                keys,
                read_only: self.read_only,
                tables: RwLock::new(FxHashMap::default()),
            }),
        }
    }
}
