//! Extraction of `field@locale` cells into nested translations.

use census_domain::{LOCALE_DELIMITER, Row, Translations};

/// Moves every `field@locale` cell of `row` into `translations[locale][field]`.
///
/// The key is split at its first `@`. Keys without one, or with an empty field or
/// locale part, stay plain fields. A row without translated cells yields empty
/// translations.
pub fn merge(mut row: Row) -> (Row, Translations) {
    let mut translations = Translations::new();
    row.retain(|key, value| {
        let Some((field, locale)) = split_key(key) else {
            return true;
        };
        translations.entry(locale.to_owned()).or_default().insert(field.to_owned(), value.to_owned());
        false
    });
    (row, translations)
}

/// Splits `title@fr` into `("title", "fr")`.
#[must_use]
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(LOCALE_DELIMITER).filter(|(field, locale)| !field.is_empty() && !locale.is_empty())
}
