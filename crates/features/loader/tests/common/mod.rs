#![allow(dead_code)]

use census_domain::{Model, Row, Settings, Site};
use census_kernel::config::ConfigResolver;
use census_loader::Loader;
use census_sheets::{SheetError, TabularSource};
use census_store::{Document, MemoryStore, Store, StoreError, document};
use std::collections::HashMap;
use std::sync::Arc;

pub const REGISTRY: &str = "registry";

/// Serves fixed sheets by locator.
#[derive(Debug, Default)]
pub struct StaticSource {
    sheets: HashMap<String, Vec<Row>>,
}

impl StaticSource {
    pub fn sheet(mut self, locator: &str, rows: &[&[(&str, &str)]]) -> Self {
        let rows = rows.iter().map(|cells| cells.iter().copied().collect()).collect();
        self.sheets.insert(locator.to_owned(), rows);
        self
    }
}

impl TabularSource for StaticSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<Row>, SheetError> {
        self.sheets.get(locator).cloned().ok_or_else(|| SheetError::Status {
            message: "404 Not Found".into(),
            context: Some(locator.to_owned().into()),
        })
    }
}

/// Rejects upserts of documents whose `id` is `reject`.
#[derive(Debug)]
pub struct RejectingStore {
    pub inner: MemoryStore,
    pub reject: &'static str,
}

impl Store for RejectingStore {
    async fn find_by_id(&self, model: Model, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.find_by_id(model, id).await
    }

    async fn count(&self, model: Model) -> Result<u64, StoreError> {
        self.inner.count(model).await
    }

    async fn upsert(&self, model: Model, document: Document) -> Result<(), StoreError> {
        if document.get("id").and_then(|id| id.as_str()) == Some(self.reject) {
            return Err(StoreError::Rejected { message: "constraint violated".into(), context: None });
        }
        self.inner.upsert(model, document).await
    }
}

pub fn config() -> ConfigResolver {
    let config = ConfigResolver::builder().env_source(HashMap::new()).build().unwrap();
    config.set("registry_url", REGISTRY);
    config
}

pub fn loader(source: StaticSource) -> Loader<StaticSource, MemoryStore> {
    Loader::new(source, Arc::new(MemoryStore::builder().build()), config())
}

pub async fn seed_site<S: Store>(store: &S, id: &str, settings: &[(&str, &str)]) {
    let settings: Settings = settings.iter().map(|(k, v)| ((*k).to_owned(), (*v).into())).collect();
    let site = Site { id: id.to_owned(), settings };
    store.upsert(Model::Site, document(&site).unwrap()).await.unwrap();
}
