use super::pages::{PageRenderer, VerbatimRenderer};
use super::{ConfigError, ConfigErrorExt, ConfigResolver, ENV_PREFIX, ENV_SEPARATOR, LOCALES_KEY, defaults};
use config::{Config, Environment, File, Map, Source};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::info;

/// Content pages rendered into configuration at build time: key and file name.
const PAGES: &[(&str, &str)] = &[("submit_page", "submit.md"), ("review_page", "review.md")];
const LIST_SEPARATOR: &str = ",";

/// A fluent builder for a [`ConfigResolver`].
///
/// Layers, lowest priority first: compiled-in defaults (including rendered content
/// pages), an optional settings file, then `CENSUS__*` environment variables.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct ConfigResolverBuilder {
    file: Option<PathBuf>,
    pages: Option<PathBuf>,
    renderer: Box<dyn PageRenderer>,
    env_prefix: Cow<'static, str>,
    env_source: Option<Map<String, String>>,
}

impl Default for ConfigResolverBuilder {
    fn default() -> Self {
        Self {
            file: None,
            pages: None,
            renderer: Box::new(VerbatimRenderer),
            env_prefix: Cow::Borrowed(ENV_PREFIX),
            env_source: None,
        }
    }
}

impl ConfigResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from `path`; the format follows the file extension.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Renders `submit.md` and `review.md` from `dir` into the `submit_page` and
    /// `review_page` defaults.
    pub fn pages(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pages = Some(dir.into());
        self
    }

    pub fn renderer(mut self, renderer: impl PageRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Reads environment variables from `vars` instead of the process environment.
    pub fn env_source(mut self, vars: Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Merges the layers into a [`ConfigResolver`].
    ///
    /// # Errors
    /// Returns [`ConfigError::Page`] if a content page cannot be read and
    /// [`ConfigError::Config`] if the settings file is missing or malformed.
    pub fn build(self) -> Result<ConfigResolver, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in defaults::entries() {
            builder = builder.set_default(key, value).context(key)?;
        }

        if let Some(dir) = &self.pages {
            for (key, file) in PAGES {
                let path = dir.join(file);
                let source = std::fs::read_to_string(&path).context(path.display().to_string())?;
                builder = builder.set_default(*key, self.renderer.render(&source)).context(*key)?;
            }
        }

        if let Some(file) = &self.file {
            info!("Loading config from {}", file.display());
            builder = builder.add_source(File::from(file.as_path()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .list_separator(LIST_SEPARATOR)
                .with_list_parse_key(LOCALES_KEY)
                .source(self.env_source),
        );

        let table = builder
            .build()
            .context("Failed to build config")?
            .collect()
            .context("Failed to collect config")?;

        Ok(ConfigResolver::from_table(table))
    }
}
