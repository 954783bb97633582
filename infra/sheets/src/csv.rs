//! Minimal CSV reader for spreadsheet exports (quotes and CRLF tolerant).

use crate::error::SheetError;
use census_domain::Row;
use std::mem::take;

const QUOTE: char = '"';
const BOM: char = '\u{feff}';

/// Splits `text` into records of raw cells.
///
/// Blank lines are skipped. Quoted cells may contain separators, line breaks and
/// doubled quotes. A quote only opens a quoted cell at the start of a cell;
/// anywhere else it is kept as text.
///
/// # Errors
/// Returns [`SheetError::Parse`] if a quoted cell is never closed.
pub fn parse_records(text: &str, sep: char) -> Result<Vec<Vec<String>>, SheetError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1_usize;
    let mut chars = text.strip_prefix(BOM).unwrap_or(text).chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE if in_quotes => {
                if chars.next_if_eq(&QUOTE).is_some() {
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            },
            QUOTE if field.is_empty() => in_quotes = true,
            c if c == sep && !in_quotes => record.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' {
                    chars.next_if_eq(&'\n');
                }
                line += 1;
                record.push(take(&mut field));
                flush(&mut records, &mut record);
            },
            '\n' => {
                line += 1;
                field.push(ch);
            },
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(SheetError::Parse {
            message: "unterminated quoted cell".into(),
            context: Some(format!("line {line}").into()),
        });
    }

    record.push(field);
    flush(&mut records, &mut record);
    Ok(records)
}

fn flush(records: &mut Vec<Vec<String>>, record: &mut Vec<String>) {
    if record.iter().all(String::is_empty) {
        record.clear();
    } else {
        records.push(take(record));
    }
}

/// Reads `text` as a header record followed by data records.
///
/// Header names are trimmed. Missing trailing cells become empty strings and
/// surplus cells are dropped. Repeated headers keep the last cell.
///
/// # Errors
/// See [`parse_records`].
pub fn parse_rows(text: &str, sep: char) -> Result<Vec<Row>, SheetError> {
    let mut records = parse_records(text, sep)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_owned()).collect();

    Ok(records
        .map(|mut record| {
            record.resize(header.len(), String::new());
            header.iter().cloned().zip(record).collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_cells_keep_separators_and_quotes() {
        let records = parse_records("a,\"b, c\",\"say \"\"hi\"\"\"\r\n", ',').unwrap();
        assert_eq!(records, vec![vec!["a", "b, c", "say \"hi\""]]);
    }

    #[test]
    fn quoted_cells_span_lines() {
        let records = parse_records("key,value\nabout,\"line one\nline two\"\n", ',').unwrap();
        assert_eq!(records[1], ["about", "line one\nline two"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let records = parse_records("\u{feff}a,b\n\n,\n1,2\n\n", ',').unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn quotes_inside_a_cell_are_literal() {
        let rows = parse_rows("id,title\n1,5\" screen\n2,maps\n", ',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some("5\" screen"));
        assert_eq!(rows[1].get("title"), Some("maps"));
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_records("a,b\n1,\"2\n", ',').unwrap_err();
        assert!(matches!(err, SheetError::Parse { .. }));
    }

    #[test]
    fn rows_follow_the_header() {
        let rows = parse_rows(" censusid ,adminemail\ngb,a@x.com,surplus\nde\n", ',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("censusid"), Some("gb"));
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].get("adminemail"), Some(""));
    }

    #[test]
    fn duplicate_headers_keep_the_last_cell() {
        let rows = parse_rows("id,id\n1,2\n", ',').unwrap();
        assert_eq!(rows[0].get("id"), Some("2"));
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert!(parse_rows("", ',').unwrap().is_empty());
    }
}
