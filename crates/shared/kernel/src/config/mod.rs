//! Layered configuration: runtime overrides > environment > file > defaults.
//!
//! Keys are dotted paths into nested tables (`database.port`). A key may carry a
//! locale suffix (`about_page@fr`); such keys are plain table entries and are
//! resolved through [`ConfigResolver::get_localized`].

mod builder;
mod defaults;
mod pages;

pub use builder::ConfigResolverBuilder;
pub use pages::{PageRenderer, VerbatimRenderer};

use config::{Map, Value, ValueKind};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

/// Environment variable prefix (`CENSUS__DATABASE__HOST`).
pub const ENV_PREFIX: &str = "CENSUS";
/// Separator between nesting levels in environment variable names.
pub const ENV_SEPARATOR: &str = "__";
/// Key listing the supported locales; the first one is the default locale.
pub const LOCALES_KEY: &str = "locales";

const LOCALE_DELIMITER: char = census_domain::LOCALE_DELIMITER;

type Table = Map<String, Value>;

/// Custom error type for config loading and lookup.
#[census_derive::census_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Page error{}: {source}", format_context(.context))]
    Page { source: std::io::Error, context: Option<Cow<'static, str>> },
}

/// The internal shared state of a [`ConfigResolver`].
#[derive(Debug)]
pub struct ConfigResolverInner {
    base: Table,
    overrides: RwLock<Table>,
}

/// A cheaply cloneable handle to the resolved configuration.
///
/// The file, environment and default layers are merged once when the resolver is
/// built. Runtime overrides set with [`ConfigResolver::set`] shadow them until
/// [`ConfigResolver::reset`].
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    inner: Arc<ConfigResolverInner>,
}

impl Deref for ConfigResolver {
    type Target = ConfigResolverInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl ConfigResolver {
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    pub(crate) fn from_table(base: Table) -> Self {
        Self { inner: Arc::new(ConfigResolverInner { base, overrides: RwLock::new(Table::new()) }) }
    }

    /// Looks up `key` and deserializes it into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent or null.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if the value does not deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.value(key)
            .map(|value| value.try_deserialize::<T>().context(key.to_owned()))
            .transpose()
    }

    /// Looks up `key` for `locale`: `key@locale`, then `key@<default locale>`, then
    /// the bare `key`. Empty values fall through to the next candidate.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if the resolved value does not deserialize
    /// into `T`.
    pub fn get_localized<T: DeserializeOwned>(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Option<T>, ConfigError> {
        let mut candidates = vec![format!("{key}{LOCALE_DELIMITER}{locale}")];
        if let Some(default) = self.default_locale()? {
            candidates.push(format!("{key}{LOCALE_DELIMITER}{default}"));
        }

        match candidates.iter().find_map(|k| self.value(k).filter(|v| !is_blank(v))) {
            Some(value) => Ok(Some(value.try_deserialize::<T>().context(key.to_owned())?)),
            None => self.get(key),
        }
    }

    /// The first entry of [`LOCALES_KEY`].
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if `locales` is not a list of strings.
    pub fn default_locale(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.get::<Vec<String>>(LOCALES_KEY)?.and_then(|locales| locales.into_iter().next()))
    }

    /// Deserializes the whole table under `name` (e.g. `database`) into `T`,
    /// runtime overrides included.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if the table does not deserialize into `T`.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.value(name).unwrap_or_else(empty_table);
        value.try_deserialize::<T>().context(name.to_owned())
    }

    /// Deserializes the complete configuration into `T`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if the configuration does not deserialize into `T`.
    pub fn snapshot<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let mut root = self.base.clone();
        merge(&mut root, self.overrides.read().clone());
        Value::new(None, root).try_deserialize::<T>().context("snapshot")
    }

    /// Overrides `key` until the next [`ConfigResolver::reset`].
    ///
    /// Intermediate segments of a dotted key become tables, replacing any scalar
    /// override found on the way.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        debug!(key, "Setting configuration override");
        let (parents, leaf) = key.rsplit_once('.').map_or((None, key), |(p, l)| (Some(p), l));
        let mut overrides = self.overrides.write();
        let mut table = &mut *overrides;

        for segment in parents.into_iter().flat_map(|p| p.split('.')) {
            let slot = table.entry(segment.to_owned()).or_insert_with(empty_table);
            if !matches!(slot.kind, ValueKind::Table(_)) {
                *slot = empty_table();
            }
            let ValueKind::Table(next) = &mut slot.kind else { return };
            table = next;
        }
        table.insert(leaf.to_owned(), value.into());
    }

    /// Drops every runtime override.
    pub fn reset(&self) {
        debug!("Resetting configuration overrides");
        self.overrides.write().clear();
    }

    fn value(&self, key: &str) -> Option<Value> {
        let base = lookup(&self.base, key).cloned();
        let overridden = lookup(&self.overrides.read(), key).cloned();

        let value = match (base, overridden) {
            (Some(base), Some(over)) => overlay(base, over),
            (base, over) => over.or(base)?,
        };
        (!matches!(value.kind, ValueKind::Nil)).then_some(value)
    }
}

fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let mut value = table.get(segments.next()?)?;
    for segment in segments {
        let ValueKind::Table(next) = &value.kind else { return None };
        value = next.get(segment)?;
    }
    Some(value)
}

fn merge(base: &mut Table, overlay_table: Table) {
    for (key, value) in overlay_table {
        let merged = match base.remove(&key) {
            Some(existing) => overlay(existing, value),
            None => value,
        };
        base.insert(key, merged);
    }
}

fn overlay(base: Value, over: Value) -> Value {
    match (base.kind, over.kind) {
        (ValueKind::Table(mut base), ValueKind::Table(over)) => {
            merge(&mut base, over);
            Value::new(None, base)
        },
        (_, kind) => Value::new(None, kind),
    }
}

fn empty_table() -> Value {
    Value::new(None, Table::new())
}

fn is_blank(value: &Value) -> bool {
    match &value.kind {
        ValueKind::Nil => true,
        ValueKind::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ConfigResolver {
        ConfigResolver::builder().build().unwrap()
    }

    #[test]
    fn nested_overrides_merge_into_sections() {
        let config = resolver();
        config.set("database.host", "db.internal");

        assert_eq!(config.get::<String>("database.host").unwrap().as_deref(), Some("db.internal"));
        assert_eq!(config.get::<u16>("database.port").unwrap(), Some(5432));
    }

    #[test]
    fn scalar_override_replaces_table() {
        let config = resolver();
        config.set("database", "none");
        config.set("database.host", "db.internal");

        assert_eq!(config.get::<String>("database.host").unwrap().as_deref(), Some("db.internal"));
        assert_eq!(config.get::<u16>("database.port").unwrap(), Some(5432));
    }

    #[test]
    fn missing_keys_are_none() {
        let config = resolver();
        assert_eq!(config.get::<String>("registry_url").unwrap(), None);
        assert_eq!(config.get::<String>("database.missing.deeper").unwrap(), None);
    }

    #[test]
    fn blank_localized_values_fall_through() {
        let config = resolver();
        config.set("about_page@fr", "");
        config.set("about_page@en", "About");

        assert_eq!(config.get_localized::<String>("about_page", "fr").unwrap().as_deref(), Some("About"));
    }
}
