use census_derive::census_error;
use std::borrow::Cow;

#[census_error]
pub enum DemoError {
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Row rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_sheet() -> Result<String, DemoError> {
    std::fs::read_to_string("/definitely/missing.csv").context("Reading sheet export")
}

fn reject() -> Result<(), DemoError> {
    Err(DemoError::Rejected { message: "bad row".into(), context: None }).context("row 3")
}

fn main() {
    let err = read_sheet().unwrap_err();
    assert!(err.to_string().starts_with("I/O error (Reading sheet export): "));

    let err = reject().unwrap_err();
    assert_eq!(err.to_string(), "Row rejected (row 3): bad row");

    let err: DemoError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");
}
