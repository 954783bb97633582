//! Typed coercion of raw `key`/`value` sheet cells into [`Settings`].

use census_domain::{REVIEWERS, SettingValue, Settings};
use std::fmt::Debug;
use std::sync::Arc;

/// One coercion step. Returns `None` to leave the cell to the next rule.
pub trait CoercionRule: Debug + Send + Sync {
    fn apply(&self, key: &str, raw: &str) -> Option<SettingValue>;
}

/// `true` / `false` in any letter case.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanRule;

impl CoercionRule for BooleanRule {
    fn apply(&self, _key: &str, raw: &str) -> Option<SettingValue> {
        if raw.eq_ignore_ascii_case("true") {
            Some(SettingValue::Bool(true))
        } else if raw.eq_ignore_ascii_case("false") {
            Some(SettingValue::Bool(false))
        } else {
            None
        }
    }
}

/// `null` in any letter case.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRule;

impl CoercionRule for NullRule {
    fn apply(&self, _key: &str, raw: &str) -> Option<SettingValue> {
        raw.eq_ignore_ascii_case("null").then_some(SettingValue::Null)
    }
}

/// Splits the non-empty value of `key` on `separator` into trimmed pieces.
#[derive(Debug, Clone)]
pub struct ListRule {
    key: String,
    separator: String,
}

impl ListRule {
    pub fn new(key: impl Into<String>, separator: impl Into<String>) -> Self {
        Self { key: key.into(), separator: separator.into() }
    }
}

impl CoercionRule for ListRule {
    fn apply(&self, key: &str, raw: &str) -> Option<SettingValue> {
        if key != self.key || raw.is_empty() {
            return None;
        }
        Some(SettingValue::List(split_list(raw, &self.separator)))
    }
}

/// Splits `raw` on `separator`, trimming every piece.
pub fn split_list(raw: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return vec![raw.trim().to_owned()];
    }
    raw.split(separator).map(|piece| piece.trim().to_owned()).collect()
}

/// An ordered list of [`CoercionRule`]s; the first rule that matches wins and
/// unmatched cells stay raw text.
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    rules: Vec<Arc<dyn CoercionRule>>,
}

impl Coercer {
    /// Booleans, then `null`, then the `reviewers` list split on `separator`.
    pub fn standard(separator: &str) -> Self {
        Self::default()
            .with_rule(BooleanRule)
            .with_rule(NullRule)
            .with_rule(ListRule::new(REVIEWERS, separator))
    }

    /// Appends `rule` after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: impl CoercionRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    #[must_use]
    pub(crate) fn with_shared_rules(mut self, rules: &[Arc<dyn CoercionRule>]) -> Self {
        self.rules.extend(rules.iter().cloned());
        self
    }

    #[must_use]
    pub fn coerce(&self, key: &str, raw: &str) -> SettingValue {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(key, raw))
            .unwrap_or_else(|| SettingValue::Text(raw.to_owned()))
    }

    /// Coerces every pair; a repeated key keeps its last value.
    pub fn settings<'a, I>(&self, pairs: I) -> Settings
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs.into_iter().map(|(key, raw)| (key.to_owned(), self.coerce(key, raw))).collect()
    }
}
