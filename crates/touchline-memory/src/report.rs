//! Human-readable rendering of a [`ChangeSet`].

use serde_json::Value;

use touchline_common::ChangeSet;

/// Report text when there was no previous snapshot to compare against.
pub const NO_BASELINE: &str = "No previous snapshot exists. Unable to report changes.";

/// Renders `changes` as a multi-line report.
///
/// The output has three sections in a fixed order (added, removed,
/// attribute changes), each replaced by a single sentence when empty.
#[must_use]
pub fn report(changes: Option<&ChangeSet>) -> String {
    let Some(changes) = changes else {
        return NO_BASELINE.to_string();
    };

    let mut lines = Vec::new();

    if changes.added.is_empty() {
        lines.push("No new players added.".to_string());
    } else {
        lines.push("New players added:".to_string());
        lines.extend(changes.added.iter().map(|name| format!(" - {name}")));
    }

    if changes.removed.is_empty() {
        lines.push("No players removed.".to_string());
    } else {
        lines.push("Players removed:".to_string());
        lines.extend(changes.removed.iter().map(|name| format!(" - {name}")));
    }

    if changes.attribute_changes.is_empty() {
        lines.push("No changes in player attributes detected.".to_string());
    } else {
        lines.push("Changes in player attributes:".to_string());
        for record in &changes.attribute_changes {
            lines.push(format!(" - {}:", record.identity));
            for change in &record.fields {
                lines.push(format!(
                    "     {}: {} → {}",
                    change.field,
                    render_value(&change.old),
                    render_value(&change.new)
                ));
            }
        }
    }

    lines.join("\n")
}

/// Renders one attribute value: strings bare, `null` as `none`.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::diff::diff;
    use serde_json::json;
    use touchline_common::{Collection, FieldChange, RecordChanges};

    fn collection(value: Value) -> Collection {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_report_without_baseline() {
        assert_eq!(report(None), NO_BASELINE);
    }

    #[test]
    fn test_report_empty_change_set() {
        let text = report(Some(&ChangeSet::default()));
        assert_eq!(
            text,
            "No new players added.\nNo players removed.\nNo changes in player attributes detected."
        );
        assert_ne!(text, NO_BASELINE);
    }

    #[test]
    fn test_report_from_diff() {
        let old = collection(json!([{"name": "A", "age": 20}]));
        let new = collection(json!([{"name": "A", "age": 21}, {"name": "B", "age": 19}]));

        let text = report(diff(Some(&old), &new).as_ref());
        assert_eq!(
            text,
            "New players added:\n - B\nNo players removed.\nChanges in player attributes:\n - A:\n     age: 20 → 21"
        );
    }

    #[test]
    fn test_report_sections_in_order() {
        let changes = ChangeSet {
            added: vec!["New Guy".to_string()],
            removed: vec!["Old Guy".to_string(), "Other".to_string()],
            attribute_changes: vec![RecordChanges {
                identity: "Stayer".to_string(),
                fields: vec![
                    FieldChange {
                        field: "form".to_string(),
                        old: json!(4),
                        new: json!(5),
                    },
                    FieldChange {
                        field: "kicking".to_string(),
                        old: json!("7"),
                        new: Value::Null,
                    },
                ],
            }],
        };

        let text = report(Some(&changes));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "New players added:",
                " - New Guy",
                "Players removed:",
                " - Old Guy",
                " - Other",
                "Changes in player attributes:",
                " - Stayer:",
                "     form: 4 → 5",
                "     kicking: 7 → none",
            ]
        );
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&Value::Null), "none");
        assert_eq!(render_value(&json!("Auckland")), "Auckland");
        assert_eq!(render_value(&json!(12.5)), "12.5");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
