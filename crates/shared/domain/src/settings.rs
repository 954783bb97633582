use crate::{ADMIN_EMAIL, CONFIG_URL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed setting produced from a raw sheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    List(Vec<String>),
    Text(String),
    Null,
}

impl SettingValue {
    /// Returns the text value, if this setting is plain text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for SettingValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for SettingValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// A flat settings map keyed by the original column name.
pub type Settings = BTreeMap<String, SettingValue>;

/// One site deployment listed in the registry sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    #[serde(default)]
    pub settings: Settings,
}

impl RegistryEntry {
    /// Administrator addresses, in sheet order.
    #[must_use]
    pub fn admin_emails(&self) -> &[String] {
        match self.settings.get(ADMIN_EMAIL) {
            Some(SettingValue::List(items)) => items,
            Some(SettingValue::Text(text)) => std::slice::from_ref(text),
            _ => &[],
        }
    }

    /// Locator of the site's configuration sheet.
    #[must_use]
    pub fn config_url(&self) -> Option<&str> {
        self.settings.get(CONFIG_URL).and_then(SettingValue::as_text)
    }
}

/// Per-site configuration, replaced wholesale on every config load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub settings: Settings,
}

impl Site {
    /// Returns the text setting `name`, typically the locator of a dataset sheet.
    #[must_use]
    pub fn locator(&self, name: &str) -> Option<&str> {
        self.settings.get(name).and_then(SettingValue::as_text).filter(|s| !s.is_empty())
    }
}
