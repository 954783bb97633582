use serde::Deserialize;

/// Relational database connection parameters (`database` section).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
    pub dialect: String,
}

/// Web application knobs (`appconfig` section).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub auth_on: bool,
    pub auth_user: Option<String>,
    pub auth_passhash: Option<String>,
    pub review_passhash: Option<String>,
    pub readonly: bool,
}

/// Process-wide census settings: the top level of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    pub config_url: String,
    pub registry_url: Option<String>,
    pub censusid: String,
    pub title_short: String,
    pub display_year: u32,
    pub submit_year: u32,
    pub site_url: String,
    pub locales: Vec<String>,
    pub field_separator: String,
    pub database: DatabaseConfig,
    pub appconfig: AppConfig,
}

// --- Default ---

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            config_url: "http://config.url".to_owned(),
            registry_url: None,
            censusid: "noid".to_owned(),
            title_short: "Census".to_owned(),
            display_year: 2014,
            submit_year: 2014,
            site_url: "http://localhost:5000".to_owned(),
            locales: vec!["en".to_owned()],
            field_separator: ",".to_owned(),
            database: DatabaseConfig::default(),
            appconfig: AppConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            username: "opendatacensus".to_owned(),
            password: String::new(),
            database: "opendatacensus".to_owned(),
            host: "localhost".to_owned(),
            port: 5432,
            dialect: "postgres".to_owned(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            auth_on: false,
            auth_user: None,
            auth_passhash: None,
            review_passhash: None,
            readonly: false,
        }
    }
}
