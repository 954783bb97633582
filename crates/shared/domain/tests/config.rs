use census_domain::config::{AppConfig, DatabaseConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let db = DatabaseConfig::default();
    assert_eq!(db.host, "localhost");
    assert_eq!(db.port, 5432);
    assert_eq!(db.dialect, "postgres");
    assert!(db.password.is_empty());

    let app = AppConfig::default();
    assert_eq!(app.port, 5000);
    assert!(!app.auth_on);
    assert!(app.auth_user.is_none());
}

#[test]
fn sections_deserialize_with_partial_input() {
    let db: DatabaseConfig =
        serde_json::from_value(json!({ "host": "db.internal", "port": 6543 })).expect("database");
    assert_eq!(db.host, "db.internal");
    assert_eq!(db.port, 6543);
    assert_eq!(db.username, "opendatacensus");

    let app: AppConfig =
        serde_json::from_value(json!({ "auth_on": true, "auth_user": "admin" })).expect("app");
    assert!(app.auth_on);
    assert_eq!(app.auth_user.as_deref(), Some("admin"));
    assert_eq!(app.port, 5000);
}
