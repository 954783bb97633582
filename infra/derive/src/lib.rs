#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the census workspace.
//!
//! The only macro today is [`census_error`], which turns a plain enum into the
//! error type every crate in the workspace exposes from its `error.rs`.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! census-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait adding `.context(...)` to
///   `Result<T, Name>` and to `Result<T, Source>` for every wrapped source type.
/// * **Conversions**: Implements `From<Source>` for variants with a `source` field
///   (or a field marked `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant with a `message` field exists.
/// * **Formatting helper**: a module-private `format_context` function that renders the
///   optional context as ` (context)` for use in `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with **named-field** variants.
/// 2. A variant wrapping a source must carry exactly two fields: the source and
///    `context: Option<Cow<'static, str>>`.
/// 3. A source type may be wrapped by one variant only.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[census_derive::census_error]
/// pub enum FetchError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fetch error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, FetchError> {
///     std::fs::read_to_string(path).context("Reading sheet export")
/// }
/// ```
#[proc_macro_attribute]
pub fn census_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
