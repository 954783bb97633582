//! # Census loader
//!
//! Fetches the census spreadsheets and upserts their rows into a [`census_store::Store`]:
//!
//! * the registry of site deployments ([`Loader::load_registry`]),
//! * each site's configuration ([`Loader::load_config`]), coerced into typed settings,
//! * per-site datasets ([`Loader::load_data`], [`Loader::load_translated_data`]).
//!
//! ```rust,no_run
//! use census_domain::Model;
//! use census_kernel::config::ConfigResolver;
//! use census_loader::{DataLoad, Loader};
//! use census_sheets::SheetSource;
//! use census_store::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigResolver::builder().build()?;
//!     config.set("registry_url", "https://example.org/registry.csv");
//!
//!     let loader = Loader::new(SheetSource::new()?, Arc::new(MemoryStore::builder().build()), config);
//!     loader.load_registry().await?;
//!     loader.load_config("gb").await?;
//!     loader.load_translated_data(&DataLoad::new("gb", "questions", Model::Question)).await?;
//!     Ok(())
//! }
//! ```

pub mod coercion;
mod error;
mod loader;
pub mod mapper;
pub mod translation;

pub use coercion::{Coercer, CoercionRule};
pub use error::{LoaderError, LoaderErrorExt};
pub use loader::{DEFAULT_FIELD_SEPARATOR, DataLoad, FIELD_SEPARATOR_KEY, Loader, REGISTRY_URL_KEY};
pub use mapper::{IdentityMapper, RowMapper};
