mod common;

use census_domain::{Model, RegistryEntry, SettingValue};
use census_loader::{Loader, LoaderError};
use census_store::{MemoryStore, Store, from_document};
use common::{REGISTRY, RejectingStore, StaticSource, config, loader};
use std::sync::Arc;

#[tokio::test]
async fn admin_emails_are_split_on_the_configured_separator() {
    let source = StaticSource::default().sheet(
        REGISTRY,
        &[&[("censusid", "gb"), ("adminemail", "a@x.com;b@y.com"), ("configurl", "gb-config")]],
    );
    let loader = loader(source);
    loader.config().set("field_separator", ";");

    assert_eq!(loader.load_registry().await.unwrap(), 1);

    let stored = loader.store().find_by_id(Model::Registry, "gb").await.unwrap().unwrap();
    let entry: RegistryEntry = from_document(stored).unwrap();
    assert_eq!(
        entry.settings["adminemail"],
        SettingValue::List(vec!["a@x.com".to_owned(), "b@y.com".to_owned()])
    );
    assert_eq!(entry.config_url(), Some("gb-config"));
    assert!(!entry.settings.contains_key("censusid"));
}

#[tokio::test]
async fn one_rejected_row_fails_the_load_without_rollback() {
    let rows: Vec<[(&str, &str); 1]> =
        ["r1", "r2", "r3", "r4", "r5"].iter().map(|id| [("censusid", *id)]).collect();
    let rows: Vec<&[(&str, &str)]> = rows.iter().map(<[_; 1]>::as_slice).collect();

    let store = Arc::new(RejectingStore { inner: MemoryStore::builder().build(), reject: "r3" });
    let loader = Loader::new(StaticSource::default().sheet(REGISTRY, &rows), Arc::clone(&store), config());

    let err = loader.load_registry().await.unwrap_err();

    assert!(matches!(err, LoaderError::Persistence { .. }), "{err}");
    assert_eq!(store.count(Model::Registry).await.unwrap(), 4);
}

#[tokio::test]
async fn missing_registry_url_is_not_found() {
    let loader = loader(StaticSource::default());
    loader.config().reset();

    let err = loader.load_registry().await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { .. }), "{err}");
}

#[tokio::test]
async fn fetch_failure_writes_nothing() {
    let loader = loader(StaticSource::default());

    let err = loader.load_registry().await.unwrap_err();

    assert!(matches!(err, LoaderError::Fetch { .. }), "{err}");
    assert_eq!(loader.store().count(Model::Registry).await.unwrap(), 0);
}

#[tokio::test]
async fn reloading_overwrites_entries() {
    let loader = loader(
        StaticSource::default()
            .sheet(REGISTRY, &[&[("censusid", "gb"), ("title", "UK")], &[("censusid", "de"), ("title", "DE")]]),
    );

    assert_eq!(loader.load_registry().await.unwrap(), 2);
    assert_eq!(loader.load_registry().await.unwrap(), 2);
    assert_eq!(loader.store().count(Model::Registry).await.unwrap(), 2);
}
