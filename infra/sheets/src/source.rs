use crate::csv::parse_rows;
use crate::error::{SheetError, SheetErrorExt};
use crate::locator::csv_url;
use crate::TabularSource;
use census_domain::Row;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SEPARATOR: char = ',';

/// Fetches CSV sheets over HTTP(S) or from the local filesystem.
///
/// `http://` and `https://` locators are normalized with [`csv_url`] before the
/// request; `file://` URLs and bare paths are read from disk.
#[derive(Debug, Clone)]
pub struct SheetSource {
    client: Client,
    separator: char,
}

impl SheetSource {
    /// Creates a source with the default request timeout.
    ///
    /// # Errors
    /// Returns [`SheetError::Http`] if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, SheetError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a source whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns [`SheetError::Http`] if the HTTP client cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SheetError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;

        Ok(Self { client, separator: DEFAULT_SEPARATOR })
    }

    /// Uses `separator` between cells instead of `,`.
    #[must_use]
    pub const fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    async fn download(&self, locator: &str) -> Result<String, SheetError> {
        let url = csv_url(locator)?;
        debug!(%url, "Requesting sheet");

        let response = self.client.get(&url).send().await.context(url.clone())?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Status { message: status.to_string().into(), context: Some(url.into()) });
        }
        response.text().await.context(url)
    }

    async fn read(path: PathBuf) -> Result<String, SheetError> {
        debug!(path = %path.display(), "Reading sheet");
        let context = path.display().to_string();
        tokio::fs::read_to_string(path).await.context(context)
    }
}

impl TabularSource for SheetSource {
    #[instrument(skip(self), err)]
    async fn fetch(&self, locator: &str) -> Result<Vec<Row>, SheetError> {
        let text = match Location::of(locator)? {
            Location::Remote => self.download(locator).await?,
            Location::Local(path) => Self::read(path).await?,
        };

        let rows = parse_rows(&text, self.separator).context(locator.to_owned())?;
        debug!(rows = rows.len(), "Parsed sheet");
        Ok(rows)
    }
}

enum Location {
    Remote,
    Local(PathBuf),
}

impl Location {
    fn of(locator: &str) -> Result<Self, SheetError> {
        let scheme = locator.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http" | "https") => Ok(Self::Remote),
            Some("file") => {
                let url = Url::parse(locator).context(locator.to_owned())?;
                url.to_file_path().map(Self::Local).map_err(|()| SheetError::Parse {
                    message: "not a local file URL".into(),
                    context: Some(locator.to_owned().into()),
                })
            },
            Some(other) => Err(SheetError::Parse {
                message: format!("unsupported scheme `{other}`").into(),
                context: Some(locator.to_owned().into()),
            }),
            None => Ok(Self::Local(PathBuf::from(locator))),
        }
    }
}
