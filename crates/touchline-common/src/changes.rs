use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field whose value differs between two snapshots.
///
/// A field absent from a record is represented as `Value::Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Attribute or skill name.
    pub field: String,
    /// Value in the previous snapshot.
    pub old: Value,
    /// Value in the current snapshot.
    pub new: Value,
}

/// All changed fields of one player present in both snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChanges {
    /// The player's identity (name).
    pub identity: String,
    /// Changed fields, tracked attributes first, then skills.
    pub fields: Vec<FieldChange>,
}

impl RecordChanges {
    /// Looks up the change recorded for `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&FieldChange> {
        self.fields.iter().find(|change| change.field == field)
    }
}

/// Structural difference between two roster snapshots.
///
/// Serializes as
/// `{"added": [..], "removed": [..], "attribute_changes": {name: {field: {"old", "new"}}}}`
/// with map entries in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Identities present in the new snapshot only.
    #[serde(default, alias = "new_players")]
    pub added: Vec<String>,
    /// Identities present in the old snapshot only.
    #[serde(default, alias = "removed_players")]
    pub removed: Vec<String>,
    /// Per-identity field changes, for identities present in both.
    #[serde(default, with = "attribute_map")]
    pub attribute_changes: Vec<RecordChanges>,
}

impl ChangeSet {
    /// True when nothing was added, removed or changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.attribute_changes.is_empty()
    }

    /// Returns the attribute changes recorded for `identity`.
    #[must_use]
    pub fn changes_for(&self, identity: &str) -> Option<&RecordChanges> {
        self.attribute_changes
            .iter()
            .find(|record| record.identity == identity)
    }
}

/// (De)serializes `Vec<RecordChanges>` as an ordered nested JSON object.
mod attribute_map {
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    use super::{FieldChange, RecordChanges};

    #[derive(Serialize)]
    struct PairRef<'a> {
        old: &'a Value,
        new: &'a Value,
    }

    #[derive(Deserialize)]
    struct Pair {
        #[serde(default)]
        old: Value,
        #[serde(default)]
        new: Value,
    }

    struct Fields<'a>(&'a [FieldChange]);

    impl Serialize for Fields<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for change in self.0 {
                map.serialize_entry(
                    &change.field,
                    &PairRef {
                        old: &change.old,
                        new: &change.new,
                    },
                )?;
            }
            map.end()
        }
    }

    pub fn serialize<S: Serializer>(
        changes: &[RecordChanges],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(changes.len()))?;
        for record in changes {
            map.serialize_entry(&record.identity, &Fields(&record.fields))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<RecordChanges>, D::Error> {
        let raw: Map<String, Value> = Map::deserialize(deserializer)?;
        let mut changes = Vec::with_capacity(raw.len());

        for (identity, fields) in raw {
            let fields: Map<String, Value> =
                serde_json::from_value(fields).map_err(D::Error::custom)?;
            let mut parsed = Vec::with_capacity(fields.len());
            for (field, pair) in fields {
                let Pair { old, new } = serde_json::from_value(pair).map_err(D::Error::custom)?;
                parsed.push(FieldChange { field, old, new });
            }
            changes.push(RecordChanges {
                identity,
                fields: parsed,
            });
        }

        Ok(changes)
    }
}
