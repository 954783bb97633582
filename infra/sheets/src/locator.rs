//! Published-spreadsheet locators.

use crate::error::{SheetError, SheetErrorExt};
use url::Url;

const PUBLISH_URL: &str = "https://docs.google.com/spreadsheet/pub";
const DEFAULT_SHEET: &str = "0";

/// The spreadsheet key and sheet index carried by a locator URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetLocator {
    pub key: Option<String>,
    pub sheet: Option<String>,
}

impl SheetLocator {
    /// Extracts the `key` query parameter and the sheet index from a `#gid=N`
    /// fragment (or a `gid` query parameter).
    ///
    /// # Errors
    /// Returns [`SheetError::Locator`] if `locator` is not an absolute URL.
    pub fn parse(locator: &str) -> Result<Self, SheetError> {
        let url = Url::parse(locator).context(locator.to_owned())?;
        Ok(Self::from_url(&url))
    }

    fn from_url(url: &Url) -> Self {
        let query = |name: &str| {
            url.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
        };
        let sheet = url
            .fragment()
            .and_then(|f| f.split('&').find_map(|part| part.strip_prefix("gid=")))
            .map(str::to_owned)
            .or_else(|| query("gid"));

        Self { key: query("key").filter(|k| !k.is_empty()), sheet }
    }
}

/// Rewrites a spreadsheet URL into its single-sheet CSV export URL.
///
/// URLs without a `key`, and URLs already asking for `output=csv`, are returned
/// unchanged.
///
/// # Errors
/// Returns [`SheetError::Locator`] if `locator` is not an absolute URL.
pub fn csv_url(locator: &str) -> Result<String, SheetError> {
    let url = Url::parse(locator).context(locator.to_owned())?;
    if url.query_pairs().any(|(k, v)| k == "output" && v == "csv") {
        return Ok(locator.to_owned());
    }

    let SheetLocator { key: Some(key), sheet } = SheetLocator::from_url(&url) else {
        return Ok(locator.to_owned());
    };
    let sheet = sheet.unwrap_or_else(|| DEFAULT_SHEET.to_owned());

    let export = Url::parse_with_params(
        PUBLISH_URL,
        [("key", key.as_str()), ("single", "true"), ("gid", sheet.as_str()), ("output", "csv")],
    )
    .context("Building export URL")?;
    Ok(export.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0AqR8dXc6Ji4JdFI0QkpGUEZyS0wxYWtLdG1nTk9zU3c";

    #[test]
    fn parses_key_and_fragment_sheet() {
        let url = format!("https://docs.google.com/a/okfn.org/spreadsheet/ccc?key={KEY}#gid=3");
        let locator = SheetLocator::parse(&url).unwrap();

        assert_eq!(locator.key.as_deref(), Some(KEY));
        assert_eq!(locator.sheet.as_deref(), Some("3"));
    }

    #[test]
    fn rewrites_to_csv_export() {
        let url = format!("https://docs.google.com/a/okfn.org/spreadsheet/ccc?key={KEY}#gid=1");
        assert_eq!(
            csv_url(&url).unwrap(),
            format!("{PUBLISH_URL}?key={KEY}&single=true&gid=1&output=csv")
        );
    }

    #[test]
    fn missing_sheet_defaults_to_first() {
        let url = format!("https://docs.google.com/spreadsheet/ccc?key={KEY}");
        assert!(csv_url(&url).unwrap().ends_with("&gid=0&output=csv"));
    }

    #[test]
    fn csv_and_keyless_urls_are_unchanged() {
        let csv = format!("{PUBLISH_URL}?key={KEY}&single=true&gid=4&output=csv");
        assert_eq!(csv_url(&csv).unwrap(), csv);

        let plain = "http://example.org/registry.csv";
        assert_eq!(csv_url(plain).unwrap(), plain);
    }

    #[test]
    fn relative_locators_are_rejected() {
        assert!(matches!(csv_url("registry.csv"), Err(SheetError::Locator { .. })));
    }
}
