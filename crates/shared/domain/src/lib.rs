//! # Domain Models
//!
//! Pure census types with minimal dependencies (`serde`, `strum`).
//! No I/O, networking, or persistence here: rows as they come out of a sheet,
//! typed settings, registry entries, sites and the records loaded for a site.

pub mod config;
pub mod model;
pub mod record;
pub mod row;
pub mod settings;

pub use model::Model;
pub use record::{Record, Translations};
pub use row::Row;
pub use settings::{RegistryEntry, SettingValue, Settings, Site};

/// Column holding the site identifier in the registry sheet.
pub const CENSUS_ID: &str = "censusid";
/// Column holding administrator addresses in the registry sheet.
pub const ADMIN_EMAIL: &str = "adminemail";
/// Registry setting pointing at a site's configuration sheet.
pub const CONFIG_URL: &str = "configurl";
/// Settings key whose value is a separated list of reviewer ids.
pub const REVIEWERS: &str = "reviewers";
/// Field stamped on every loaded record.
pub const SITE_FIELD: &str = "site";
/// Field holding nested per-locale values.
pub const TRANSLATIONS_FIELD: &str = "translations";
/// Delimiter between a field name and its locale (`title@fr`).
pub const LOCALE_DELIMITER: char = '@';
