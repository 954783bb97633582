use census_kernel::config::ConfigError;
use census_sheets::SheetError;
use census_store::StoreError;
use std::borrow::Cow;

/// A specialized [`LoaderError`] enum of this crate.
#[census_derive::census_error]
pub enum LoaderError {
    /// The tabular source could not be fetched or parsed.
    #[error("Fetch failed{}: {source}", format_context(.context))]
    Fetch { source: SheetError, context: Option<Cow<'static, str>> },

    /// A referenced registry entry, site or locator setting does not exist.
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The store rejected a lookup or an upsert.
    #[error("Persistence failed{}: {source}", format_context(.context))]
    Persistence { source: StoreError, context: Option<Cow<'static, str>> },

    /// A configuration value has the wrong type.
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal loader error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl LoaderError {
    pub(crate) fn not_found(what: impl Into<Cow<'static, str>>, id: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: id.into(), context: Some(what.into()) }
    }
}
