use std::borrow::Cow;

/// A specialized [`SheetError`] enum of this crate.
#[census_derive::census_error]
pub enum SheetError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The server answered with a non-success status.
    #[error("Unexpected response status{}: {message}", format_context(.context))]
    Status { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A local source could not be read.
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The locator is not a valid URL.
    #[error("Invalid locator{}: {source}", format_context(.context))]
    Locator { source: url::ParseError, context: Option<Cow<'static, str>> },

    /// The payload is not tabular data.
    #[error("Malformed sheet{}: {message}", format_context(.context))]
    Parse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal sheet error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
