use census_domain::{Model, Record, SettingValue, Settings, Site};
use serde_json::json;
use std::str::FromStr;

#[test]
fn setting_values_serialize_untagged() {
    let mut settings = Settings::new();
    settings.insert("approve_first_submission".into(), SettingValue::Bool(false));
    settings.insert("banner_text".into(), SettingValue::Null);
    settings.insert("reviewers".into(), vec!["tester".to_owned(), "a-reviewer".to_owned()].into());
    settings.insert("title".into(), "Test Open Data Census".into());

    let site = Site { id: "gb".into(), settings };
    let value = serde_json::to_value(&site).expect("serialize");

    assert_eq!(
        value,
        json!({
            "id": "gb",
            "settings": {
                "approve_first_submission": false,
                "banner_text": null,
                "reviewers": ["tester", "a-reviewer"],
                "title": "Test Open Data Census",
            }
        })
    );

    let back: Site = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, site);
}

#[test]
fn record_flattens_fields_next_to_site() {
    let record = Record {
        site: "gb".into(),
        fields: [("place".to_owned(), "gb".to_owned()), ("dataset".to_owned(), "maps".to_owned())]
            .into(),
        translations: None,
    };

    let value = serde_json::to_value(&record).expect("serialize");
    assert_eq!(value, json!({ "site": "gb", "place": "gb", "dataset": "maps" }));

    let back: Record = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, record);
}

#[test]
fn model_names_are_snake_case() {
    assert_eq!(Model::Submission.to_string(), "submission");
    assert_eq!(Model::from_str("Entry").ok(), Some(Model::Entry));
    assert!(Model::Entry.is_site_scoped());
    assert!(!Model::Registry.is_site_scoped());
}
