use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-locale field values: `locale -> field -> value`.
pub type Translations = BTreeMap<String, BTreeMap<String, String>>;

/// A row loaded for one site (entry, submission, question, ...).
///
/// `site` is always set by the loader; translated cells live only under
/// `translations`, never as top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub site: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Translations>,
}

impl Record {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns a copy with every existing field replaced by its `locale` translation.
    ///
    /// Translated fields the record does not already have are ignored.
    #[must_use]
    pub fn translated(&self, locale: &str) -> Self {
        let mut out = self.clone();
        let Some(localized) = self.translations.as_ref().and_then(|t| t.get(locale)) else {
            return out;
        };
        for (field, value) in localized {
            if let Some(slot) = out.fields.get_mut(field) {
                slot.clone_from(value);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        let mut translations = Translations::new();
        translations.entry("fr".into()).or_default().extend([
            ("title".to_owned(), "Titre".to_owned()),
            ("extra".to_owned(), "Supplément".to_owned()),
        ]);
        Record {
            site: "gb".into(),
            fields: [("title".to_owned(), "Title".to_owned())].into(),
            translations: Some(translations),
        }
    }

    #[test]
    fn translated_overrides_existing_fields_only() {
        let fr = record().translated("fr");
        assert_eq!(fr.get("title"), Some("Titre"));
        assert_eq!(fr.get("extra"), None);
    }

    #[test]
    fn translated_without_locale_is_unchanged() {
        let original = record();
        assert_eq!(original.translated("de"), original);
    }
}
