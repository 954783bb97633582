//! Kernel utilities shared across the census crates.
//! Keep this crate lightweight; today it hosts the layered configuration resolver.
//!
//! ## Configuration
//! ```rust
//! use census_kernel::config::ConfigResolver;
//!
//! let config = ConfigResolver::builder().build().unwrap();
//! assert_eq!(config.get::<String>("censusid").unwrap().as_deref(), Some("noid"));
//!
//! config.set("title@fr", "Recensement");
//! config.set("title", "Census");
//! assert_eq!(config.get_localized::<String>("title", "fr").unwrap().as_deref(), Some("Recensement"));
//! assert_eq!(config.get_localized::<String>("title", "de").unwrap().as_deref(), Some("Census"));
//! ```
pub mod config;

pub use census_domain as domain;
