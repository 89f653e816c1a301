use std::{fmt, str::FromStr};

use crate::Error;

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Most recent first
    #[default]
    New,

    /// Oldest first
    Old,

    /// Highest score first, most recent first among equal scores
    Top,
}

impl SortKind {
    pub const ALL: [SortKind; 3] = [SortKind::New, SortKind::Old, SortKind::Top];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKind::New => "new",
            SortKind::Old => "old",
            SortKind::Top => "top",
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<SortKind, Error> {
        SortKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownSortKind(String::from(s)))
    }
}
