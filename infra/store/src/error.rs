use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[census_derive::census_error]
pub enum StoreError {
    /// The document lacks a value for one of the model's identity key fields.
    #[error("Missing identity key{}: {message}", format_context(.context))]
    MissingKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The engine refused the write (constraint violation, read-only store, ...).
    #[error("Upsert rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A value could not be converted to or from a stored document.
    #[error("Document conversion failed{}: {source}", format_context(.context))]
    Document { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
