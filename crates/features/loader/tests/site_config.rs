mod common;

use census_domain::{Model, SettingValue, Site};
use census_loader::{DataLoad, Loader, LoaderError};
use census_store::{MemoryStore, Store, from_document};
use common::{REGISTRY, StaticSource, config, loader};
use std::sync::Arc;

fn source() -> StaticSource {
    StaticSource::default()
        .sheet(
            REGISTRY,
            &[&[("censusid", "gb"), ("configurl", "gb-config")], &[("censusid", "fr"), ("configurl", "")]],
        )
        .sheet(
            "gb-config",
            &[
                &[("key", "title"), ("value", "UK Open Data Census")],
                &[("key", "reviewers"), ("value", "tester, a-reviewer")],
                &[("key", "approve_first_submission"), ("value", "TRUE")],
                &[("key", "banner_text"), ("value", "null")],
                &[("key", "missing_place_html"), ("value", "")],
                &[("key", "about_page")],
                &[("value", "orphan")],
                &[("key", "title"), ("value", "Test Open Data Census")],
            ],
        )
}

#[tokio::test]
async fn settings_are_coerced_and_stored() {
    let loader = loader(source());
    loader.load_registry().await.unwrap();

    let site = loader.load_config("gb").await.unwrap();

    assert_eq!(site.id, "gb");
    assert_eq!(site.settings["title"], SettingValue::Text("Test Open Data Census".into()));
    assert_eq!(
        site.settings["reviewers"],
        SettingValue::List(vec!["tester".into(), "a-reviewer".into()])
    );
    assert_eq!(site.settings["approve_first_submission"], SettingValue::Bool(true));
    assert_eq!(site.settings["banner_text"], SettingValue::Null);
    assert_eq!(site.settings["missing_place_html"], SettingValue::Text(String::new()));
    assert_eq!(site.settings["about_page"], SettingValue::Text(String::new()));
    assert_eq!(site.settings.len(), 6);

    let stored: Site = from_document(loader.store().find_by_id(Model::Site, "gb").await.unwrap().unwrap()).unwrap();
    assert_eq!(stored, site);
}

#[tokio::test]
async fn reloading_is_idempotent() {
    let loader = loader(source());
    loader.load_registry().await.unwrap();

    let first = loader.load_config("gb").await.unwrap();
    let stored_first = loader.store().find_by_id(Model::Site, "gb").await.unwrap();
    let second = loader.load_config("gb").await.unwrap();
    let stored_second = loader.store().find_by_id(Model::Site, "gb").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stored_first, stored_second);
    assert_eq!(loader.store().count(Model::Site).await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_site_is_not_found() {
    let loader = loader(source());
    loader.load_registry().await.unwrap();

    let err = loader.load_config("de").await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { .. }), "{err}");
}

#[tokio::test]
async fn empty_config_url_is_not_found() {
    let loader = loader(source());
    loader.load_registry().await.unwrap();

    let err = loader.load_config("fr").await.unwrap_err();
    assert!(matches!(err, LoaderError::NotFound { .. }), "{err}");
    assert!(loader.store().find_by_id(Model::Site, "fr").await.unwrap().is_none());
}

#[tokio::test]
async fn unreachable_config_sheet_is_a_fetch_error() {
    let loader = loader(
        StaticSource::default().sheet(REGISTRY, &[&[("censusid", "gb"), ("configurl", "nowhere")]]),
    );
    loader.load_registry().await.unwrap();

    let err = loader.load_config("gb").await.unwrap_err();
    assert!(matches!(err, LoaderError::Fetch { .. }), "{err}");
}

#[tokio::test]
async fn setting_names_are_lower_cased() {
    let loader = loader(
        StaticSource::default()
            .sheet(REGISTRY, &[&[("censusid", "gb"), ("configurl", "gb-config")]])
            .sheet(
                "gb-config",
                &[
                    &[("key", "Entries"), ("value", "entries-sheet")],
                    &[("key", "Title"), ("value", "UK")],
                    &[("key", "title"), ("value", "United Kingdom")],
                    &[("key", "Reviewers"), ("value", "a, b")],
                ],
            )
            .sheet("entries-sheet", &[&[("id", "maps")]]),
    );
    loader.load_registry().await.unwrap();

    let site = loader.load_config("gb").await.unwrap();

    assert_eq!(site.settings.keys().collect::<Vec<_>>(), ["entries", "reviewers", "title"]);
    assert_eq!(site.settings["title"], SettingValue::Text("United Kingdom".into()));
    assert_eq!(site.settings["reviewers"], SettingValue::List(vec!["a".into(), "b".into()]));

    let written = loader.load_data(&DataLoad::new("gb", "entries", Model::Entry)).await.unwrap();
    assert_eq!(written, 1);
}

#[tokio::test]
async fn reloading_replaces_the_settings_wholesale() {
    let registry: &[&[(&str, &str)]] = &[&[("censusid", "gb"), ("configurl", "gb-config")]];
    let store = Arc::new(MemoryStore::builder().build());

    let before = Loader::new(
        StaticSource::default().sheet(REGISTRY, registry).sheet(
            "gb-config",
            &[&[("key", "title"), ("value", "UK")], &[("key", "banner_text"), ("value", "Welcome")]],
        ),
        Arc::clone(&store),
        config(),
    );
    before.load_registry().await.unwrap();
    before.load_config("gb").await.unwrap();

    let after = Loader::new(
        StaticSource::default()
            .sheet(REGISTRY, registry)
            .sheet("gb-config", &[&[("key", "title"), ("value", "United Kingdom")]]),
        Arc::clone(&store),
        config(),
    );
    after.load_config("gb").await.unwrap();

    let stored: Site = from_document(store.find_by_id(Model::Site, "gb").await.unwrap().unwrap()).unwrap();
    assert_eq!(stored.settings.len(), 1);
    assert_eq!(stored.settings["title"], SettingValue::Text("United Kingdom".into()));
    assert!(!stored.settings.contains_key("banner_text"));
}
