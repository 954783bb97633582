use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Persisted model kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Model {
    Registry,
    Site,
    Entry,
    Submission,
    Question,
    Dataset,
    Place,
    User,
}

impl Model {
    /// Every model kind, in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }

    /// Whether records of this model belong to a site (and are keyed by it).
    #[must_use]
    pub const fn is_site_scoped(self) -> bool {
        !matches!(self, Self::Registry | Self::Site | Self::User)
    }
}
