use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tracked player: field name to JSON value, in insertion order.
pub type Record = Map<String, Value>;

/// An ordered roster at one point in time.
pub type Collection = Vec<Record>;

/// Natural key used to match players across snapshots.
pub const IDENTITY_FIELD: &str = "name";

/// Nested mapping of secondary attributes compared key by key.
pub const SKILLS_FIELD: &str = "skills";

/// Top-level attributes compared between two snapshots of the same player.
///
/// Fields outside this list are never diffed, even when present.
pub const TRACKED_ATTRIBUTES: [&str; 11] = [
    "age",
    "salary",
    "form",
    "aggression",
    "discipline",
    "leadership",
    "experience",
    "weight",
    "height",
    "csr",
    "energy",
];

/// Which of a club's squads a roster belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Squad {
    /// The senior team.
    #[default]
    Senior,
    /// The U20 youth team.
    Youth,
}

impl Squad {
    /// Slug used in snapshot file names and tool names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Senior => "team",
            Self::Youth => "youth_team",
        }
    }

    #[must_use]
    pub const fn is_youth(self) -> bool {
        matches!(self, Self::Youth)
    }

    /// Squad label as used in tool descriptions.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Senior => "team",
            Self::Youth => "youth U20 team",
        }
    }
}

impl fmt::Display for Squad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Senior => f.write_str("senior"),
            Self::Youth => f.write_str("youth"),
        }
    }
}

/// Returns the identity of `record` under `field`, if it is a string.
///
/// Records without a string identity are treated as malformed by callers.
#[must_use]
pub fn identity_of<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}
