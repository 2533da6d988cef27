//! Structural comparison of two roster snapshots.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use touchline_common::{
    ChangeSet, FieldChange, IDENTITY_FIELD, Record, RecordChanges, SKILLS_FIELD,
    TRACKED_ATTRIBUTES, identity_of,
};

static NULL: Value = Value::Null;

/// Compares two collections of records keyed by an identity field.
///
/// The default differ is configured for player rosters: identity `name`,
/// the fixed [`TRACKED_ATTRIBUTES`] and the nested `skills` mapping.
#[derive(Debug, Clone)]
pub struct SnapshotDiffer {
    identity_field: String,
    tracked_attributes: Vec<String>,
    nested_field: Option<String>,
}

impl Default for SnapshotDiffer {
    fn default() -> Self {
        Self::new(IDENTITY_FIELD)
            .with_tracked_attributes(TRACKED_ATTRIBUTES)
            .with_nested_field(SKILLS_FIELD)
    }
}

/// Identity-indexed view of a collection.
///
/// A repeated identity keeps its first position but takes the later record.
struct IdentityView<'a> {
    order: Vec<&'a str>,
    records: HashMap<&'a str, &'a Record>,
}

impl<'a> IdentityView<'a> {
    fn contains(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    fn get(&self, identity: &str) -> Option<&'a Record> {
        self.records.get(identity).copied()
    }

    fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Record)> + '_ {
        self.order
            .iter()
            .filter_map(|identity| self.get(identity).map(|record| (*identity, record)))
    }
}

impl SnapshotDiffer {
    /// Creates a differ that matches records on `identity_field` and compares
    /// nothing else until attributes are added.
    pub fn new(identity_field: impl Into<String>) -> Self {
        Self {
            identity_field: identity_field.into(),
            tracked_attributes: Vec::new(),
            nested_field: None,
        }
    }

    /// Sets the top-level attributes compared for matched records.
    #[must_use]
    pub fn with_tracked_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tracked_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the nested mapping whose keys are compared one by one.
    #[must_use]
    pub fn with_nested_field(mut self, field: impl Into<String>) -> Self {
        self.nested_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    /// Computes the change-set from `old` to `new`.
    ///
    /// Returns `None` when there is no baseline (`old` is `None`). Records
    /// whose identity field is missing or not a string are skipped.
    ///
    /// Nested keys are taken from the old record only: a skill that first
    /// appears in `new` is not reported.
    #[must_use]
    pub fn diff(&self, old: Option<&[Record]>, new: &[Record]) -> Option<ChangeSet> {
        let old = old?;
        let old_view = self.index(old, "old");
        let new_view = self.index(new, "new");

        let added: Vec<String> = new_view
            .order
            .iter()
            .filter(|identity| !old_view.contains(identity))
            .map(ToString::to_string)
            .collect();

        let removed: Vec<String> = old_view
            .order
            .iter()
            .filter(|identity| !new_view.contains(identity))
            .map(ToString::to_string)
            .collect();

        let attribute_changes: Vec<RecordChanges> = new_view
            .iter()
            .filter_map(|(identity, new_record)| {
                let old_record = old_view.get(identity)?;
                let fields = self.compare(old_record, new_record);
                (!fields.is_empty()).then(|| RecordChanges {
                    identity: identity.to_string(),
                    fields,
                })
            })
            .collect();

        debug!(
            added = added.len(),
            removed = removed.len(),
            changed = attribute_changes.len(),
            "Computed snapshot diff"
        );

        Some(ChangeSet {
            added,
            removed,
            attribute_changes,
        })
    }

    fn index<'a>(&self, collection: &'a [Record], side: &str) -> IdentityView<'a> {
        let mut view = IdentityView {
            order: Vec::with_capacity(collection.len()),
            records: HashMap::with_capacity(collection.len()),
        };

        for (position, record) in collection.iter().enumerate() {
            let Some(identity) = identity_of(record, &self.identity_field) else {
                warn!(
                    side,
                    position,
                    identity_field = %self.identity_field,
                    "Skipping record without a string identity"
                );
                continue;
            };

            if view.records.insert(identity, record).is_none() {
                view.order.push(identity);
            }
        }

        view
    }

    fn compare(&self, old: &Record, new: &Record) -> Vec<FieldChange> {
        let mut fields = Vec::new();

        for attribute in &self.tracked_attributes {
            push_if_changed(&mut fields, attribute, field_value(old, attribute), field_value(new, attribute));
        }

        if let Some(nested) = &self.nested_field
            && let Some(old_nested) = old.get(nested).and_then(Value::as_object)
        {
            let new_nested = new.get(nested).and_then(Value::as_object);
            for (key, old_value) in old_nested {
                let new_value = new_nested.and_then(|map| map.get(key)).unwrap_or(&NULL);
                push_if_changed(&mut fields, key, old_value, new_value);
            }
        }

        fields
    }
}

fn field_value<'a>(record: &'a Record, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&NULL)
}

/// Records a change unless the values are equal. A later change to a field
/// name already present replaces the earlier entry in place, so each name
/// appears once per record.
fn push_if_changed(fields: &mut Vec<FieldChange>, field: &str, old: &Value, new: &Value) {
    if old == new {
        return;
    }

    let change = FieldChange {
        field: field.to_string(),
        old: old.clone(),
        new: new.clone(),
    };
    match fields.iter_mut().find(|existing| existing.field == field) {
        Some(existing) => *existing = change,
        None => fields.push(change),
    }
}

/// Diffs two player rosters with the default [`SnapshotDiffer`].
#[must_use]
pub fn diff(old: Option<&[Record]>, new: &[Record]) -> Option<ChangeSet> {
    SnapshotDiffer::default().diff(old, new)
}
