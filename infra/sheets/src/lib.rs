//! # Sheets
//!
//! The tabular source contract consumed by the census loader, and [`SheetSource`],
//! which reads CSV exports of published spreadsheets or local files.
//!
//! A fetch either fails as a whole or yields every data row of the sheet, each an
//! ordered `column -> raw value` [`Row`] keyed by the header record.

pub mod csv;
mod error;
pub mod locator;
mod source;

pub use error::{SheetError, SheetErrorExt};
pub use locator::{SheetLocator, csv_url};
pub use source::SheetSource;

use census_domain::Row;
use std::future::Future;

/// A source of rows addressed by a locator string (URL or path).
pub trait TabularSource: Send + Sync + 'static {
    /// Retrieves every data row behind `locator`.
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<Vec<Row>, SheetError>> + Send;
}
