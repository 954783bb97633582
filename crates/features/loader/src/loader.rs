use crate::coercion::{Coercer, CoercionRule, split_list};
use crate::error::{LoaderError, LoaderErrorExt};
use crate::mapper::{IdentityMapper, RowMapper};
use crate::translation;
use census_domain::{
    ADMIN_EMAIL, CENSUS_ID, Model, Record, RegistryEntry, Row, SITE_FIELD, SettingValue, Settings, Site,
    TRANSLATIONS_FIELD, Translations,
};
use census_kernel::config::ConfigResolver;
use census_sheets::TabularSource;
use census_store::{Document, Store, document, from_document};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Configuration key holding the registry sheet locator.
pub const REGISTRY_URL_KEY: &str = "registry_url";
/// Configuration key holding the multi-value cell separator.
pub const FIELD_SEPARATOR_KEY: &str = "field_separator";
/// Separator used when `field_separator` is not configured.
pub const DEFAULT_FIELD_SEPARATOR: &str = ",";

const KEY_COLUMN: &str = "key";
const VALUE_COLUMN: &str = "value";

/// What a data load reads and where it writes.
#[derive(Debug, Clone)]
pub struct DataLoad<M = IdentityMapper> {
    /// Site owning the loaded records.
    pub site: String,
    /// Site setting holding the sheet locator.
    pub setting: String,
    /// Model the records are upserted into.
    pub model: Model,
    pub mapper: M,
}

impl DataLoad {
    pub fn new(site: impl Into<String>, setting: impl Into<String>, model: Model) -> Self {
        Self { site: site.into(), setting: setting.into(), model, mapper: IdentityMapper }
    }
}

impl<M: RowMapper> DataLoad<M> {
    /// Replaces the row mapper.
    pub fn mapper<N: RowMapper>(self, mapper: N) -> DataLoad<N> {
        DataLoad { site: self.site, setting: self.setting, model: self.model, mapper }
    }
}

/// The internal shared state of a [`Loader`].
#[derive(Debug)]
pub struct LoaderInner<F, S> {
    source: F,
    store: Arc<S>,
    config: ConfigResolver,
    rules: Vec<Arc<dyn CoercionRule>>,
}

/// Loads the registry, site configurations and per-site datasets from tabular
/// sources into a [`Store`].
///
/// Every row of a load is upserted concurrently. A load succeeds only if every
/// upsert succeeds; otherwise the first failure is returned once all upserts
/// have settled. Nothing is rolled back.
#[derive(Debug)]
pub struct Loader<F, S> {
    inner: Arc<LoaderInner<F, S>>,
}

impl<F, S> Clone for Loader<F, S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<F, S> Deref for Loader<F, S> {
    type Target = LoaderInner<F, S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<F: TabularSource, S: Store> Loader<F, S> {
    pub fn new(source: F, store: Arc<S>, config: ConfigResolver) -> Self {
        Self::with_rules(source, store, config, Vec::new())
    }

    /// Like [`Loader::new`], with extra coercion rules evaluated after the
    /// standard ones during config loads.
    pub fn with_rules(
        source: F,
        store: Arc<S>,
        config: ConfigResolver,
        rules: Vec<Arc<dyn CoercionRule>>,
    ) -> Self {
        Self { inner: Arc::new(LoaderInner { source, store, config, rules }) }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ConfigResolver {
        &self.config
    }

    /// Loads every registry entry from the `registry_url` sheet.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    /// [`LoaderError::NotFound`] if `registry_url` is unset, [`LoaderError::Fetch`] if
    /// the sheet cannot be fetched and [`LoaderError::Persistence`] if any upsert fails.
    #[instrument(skip(self), err)]
    pub async fn load_registry(&self) -> Result<usize, LoaderError> {
        let locator = self
            .config
            .get::<String>(REGISTRY_URL_KEY)
            .context(REGISTRY_URL_KEY)?
            .filter(|url| !url.is_empty())
            .ok_or_else(|| LoaderError::not_found("configuration", REGISTRY_URL_KEY))?;

        let rows = self.source.fetch(&locator).await.context(locator)?;
        let separator = self.separator()?;

        let documents = rows
            .into_iter()
            .map(|row| document(&registry_entry(row, &separator)))
            .collect::<Result<Vec<_>, _>>()?;

        let written = self.upsert_all(Model::Registry, documents).await?;
        info!(written, "Registry loaded");
        Ok(written)
    }

    /// Replaces the settings of site `site_id` with its configuration sheet,
    /// located by the registry entry's `configurl`. Setting names are lower-cased.
    ///
    /// # Errors
    /// [`LoaderError::NotFound`] if the registry entry or its `configurl` is absent,
    /// [`LoaderError::Fetch`] if the sheet cannot be fetched and
    /// [`LoaderError::Persistence`] if the upsert fails.
    #[instrument(skip(self), err)]
    pub async fn load_config(&self, site_id: &str) -> Result<Site, LoaderError> {
        let entry: RegistryEntry = self
            .find(Model::Registry, site_id)
            .await?
            .ok_or_else(|| LoaderError::not_found("registry entry", site_id.to_owned()))?;

        let locator = entry
            .config_url()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| LoaderError::not_found(format!("registry entry {site_id}"), "configurl"))?;

        let rows = self.source.fetch(locator).await.context(locator.to_owned())?;
        let coercer = Coercer::standard(&self.separator()?).with_shared_rules(&self.rules);
        // Keys are folded before coercion so `Title` and `title` collapse.
        let pairs: Vec<(String, &str)> = rows
            .iter()
            .filter_map(|row| Some((row.get(KEY_COLUMN)?.to_lowercase(), row.get(VALUE_COLUMN).unwrap_or_default())))
            .collect();
        let settings = coercer.settings(pairs.iter().map(|(key, raw)| (key.as_str(), *raw)));

        let site = Site { id: site_id.to_owned(), settings };
        self.store.upsert(Model::Site, document(&site)?).await.context(format!("site {site_id}"))?;

        info!(settings = site.settings.len(), "Site configuration loaded");
        Ok(site)
    }

    /// Loads the sheet named by setting `options.setting` of site `options.site`
    /// into `options.model`.
    ///
    /// Every row is passed through the mapper, stamped with the site and has its
    /// field names lower-cased. Returns the number of records written.
    ///
    /// # Errors
    /// [`LoaderError::NotFound`] if the site or setting is absent,
    /// [`LoaderError::Fetch`] if the sheet cannot be fetched and
    /// [`LoaderError::Persistence`] if any upsert fails.
    #[instrument(skip_all, fields(site = %options.site, setting = %options.setting, model = %options.model), err)]
    pub async fn load_data<M: RowMapper>(&self, options: &DataLoad<M>) -> Result<usize, LoaderError> {
        self.load_records(options, false).await
    }

    /// [`Loader::load_data`] that also moves `field@locale` cells into the
    /// record's translations, after the mapper has run.
    ///
    /// # Errors
    /// See [`Loader::load_data`].
    #[instrument(skip_all, fields(site = %options.site, setting = %options.setting, model = %options.model), err)]
    pub async fn load_translated_data<M: RowMapper>(
        &self,
        options: &DataLoad<M>,
    ) -> Result<usize, LoaderError> {
        self.load_records(options, true).await
    }

    async fn load_records<M: RowMapper>(
        &self,
        options: &DataLoad<M>,
        translated: bool,
    ) -> Result<usize, LoaderError> {
        let site: Site = self
            .find(Model::Site, &options.site)
            .await?
            .ok_or_else(|| LoaderError::not_found("site", options.site.clone()))?;

        let locator = site
            .locator(&options.setting)
            .ok_or_else(|| LoaderError::not_found(format!("site {}", site.id), options.setting.clone()))?;

        let rows = self.source.fetch(locator).await.context(locator.to_owned())?;
        debug!(rows = rows.len(), "Fetched data sheet");

        let documents = rows
            .into_iter()
            .map(|row| {
                let row = options.mapper.map(row);
                let (row, translations) = if translated {
                    let (row, translations) = translation::merge(row);
                    (row, Some(translations))
                } else {
                    (row, None)
                };
                document(&stamp(&options.site, row, translations))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let written = self.upsert_all(options.model, documents).await?;
        info!(written, "Data loaded");
        Ok(written)
    }

    async fn find<T: DeserializeOwned>(&self, model: Model, id: &str) -> Result<Option<T>, LoaderError> {
        let found = self.store.find_by_id(model, id).await.context(format!("{model} {id}"))?;
        Ok(found.map(from_document::<T>).transpose()?)
    }

    fn separator(&self) -> Result<String, LoaderError> {
        Ok(self
            .config
            .get::<String>(FIELD_SEPARATOR_KEY)
            .context(FIELD_SEPARATOR_KEY)?
            .filter(|sep| !sep.is_empty())
            .unwrap_or_else(|| DEFAULT_FIELD_SEPARATOR.to_owned()))
    }

    /// Upserts every document concurrently and waits for all of them; the first
    /// failure to settle is returned.
    async fn upsert_all(&self, model: Model, documents: Vec<Document>) -> Result<usize, LoaderError> {
        let total = documents.len();
        let mut tasks = JoinSet::new();
        for document in documents {
            let store = Arc::clone(&self.store);
            tasks.spawn(async move { store.upsert(model, document).await });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(result) => result.context(model.to_string()),
                Err(err) => Err(LoaderError::Internal {
                    message: err.to_string().into(),
                    context: Some(format!("{model} upsert task").into()),
                }),
            };
            if let Err(err) = outcome {
                warn!(%model, error = %err, "Upsert failed");
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(total), Err)
    }
}

/// Registry entry for one registry row: `censusid` becomes the id, every other
/// column a text setting, and `adminemail` a list of addresses.
fn registry_entry(row: Row, separator: &str) -> RegistryEntry {
    let mut id = String::new();
    let mut settings = Settings::new();
    for (column, value) in row {
        if column == CENSUS_ID {
            id = value;
        } else if column == ADMIN_EMAIL && !value.is_empty() {
            settings.insert(column, SettingValue::List(split_list(&value, separator)));
        } else {
            settings.insert(column, SettingValue::Text(value));
        }
    }
    RegistryEntry { id, settings }
}

/// Builds the stored record: field names lower-cased (last write wins), the owning
/// site stamped, source `site`/`translations` columns discarded.
fn stamp(site: &str, row: Row, translations: Option<Translations>) -> Record {
    let mut fields = BTreeMap::new();
    for (column, value) in row {
        let column = column.to_lowercase();
        if column == SITE_FIELD || column == TRANSLATIONS_FIELD {
            continue;
        }
        fields.insert(column, value);
    }
    Record { site: site.to_owned(), fields, translations }
}
