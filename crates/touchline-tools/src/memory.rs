//! Snapshot tools: save, load, compare and report.
//!
//! All four tools of one squad share a single [`SnapshotStore`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use touchline_common::{ObjectSchema, Parameters, Property, Squad, Tool};
use touchline_memory::{SnapshotDiffer, SnapshotStore, compare_with_snapshot, report};

use crate::{ToolImplementation, args, definition};

/// Schema of the player list accepted by save and compare.
pub(crate) fn players_property(description: &str) -> Property {
    Property::array(
        description,
        ObjectSchema::new(
            BTreeMap::from([(
                "name".to_string(),
                Property::string("Full player name, used to match players across snapshots"),
            )]),
            vec!["name".to_string()],
        ),
    )
}

/// Saves the latest roster of a team, replacing any previous snapshot.
pub struct SaveSnapshotTool {
    store: Arc<SnapshotStore>,
}

impl SaveSnapshotTool {
    pub const fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolImplementation for SaveSnapshotTool {
    fn get_definition(&self) -> Tool {
        let squad = self.store.squad();
        definition(
            format!("save_{}_snapshot", squad.slug()),
            format!(
                "Analytical tool: saves the latest snapshot of a {}'s player data to disk, \
                 replacing the previous one. This allows tracking changes over time, including \
                 all player stats and skills. Returns true on success, false otherwise.",
                squad.describe()
            ),
            Parameters::from_pairs(
                [
                    ("team_id", Property::integer("The ID of the team to save the snapshot for")),
                    (
                        "players_data",
                        players_property("List of objects representing full player data"),
                    ),
                ],
                &["team_id", "players_data"],
            ),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;
        let players = args::collection(args, "players_data")?;

        let saved = self.store.save(team_id, &players);
        if saved {
            info!(
                "Saved {} snapshot of team {team_id} ({} players)",
                self.store.squad(),
                players.len()
            );
        }
        Ok(saved.to_string())
    }
}

/// Loads the stored roster of a team, or `null` when there is none.
pub struct LoadSnapshotTool {
    store: Arc<SnapshotStore>,
}

impl LoadSnapshotTool {
    pub const fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolImplementation for LoadSnapshotTool {
    fn get_definition(&self) -> Tool {
        let squad = self.store.squad();
        definition(
            format!("load_{}_snapshot", squad.slug()),
            format!(
                "Analytical tool: loads the last saved snapshot of a {}'s player data from disk. \
                 Returns null if no snapshot exists.",
                squad.describe()
            ),
            Parameters::from_pairs(
                [("team_id", Property::integer("The ID of the team to load the snapshot for"))],
                &["team_id"],
            ),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;

        match self.store.load(team_id)? {
            Some(players) => Ok(serde_json::to_string(&players)?),
            None => {
                debug!("No {} snapshot for team {team_id}", self.store.squad());
                Ok("null".to_string())
            }
        }
    }
}

/// Compares a fresh roster with the stored snapshot.
pub struct CompareSnapshotsTool {
    store: Arc<SnapshotStore>,
    differ: SnapshotDiffer,
}

impl CompareSnapshotsTool {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
            differ: SnapshotDiffer::default(),
        }
    }
}

#[async_trait]
impl ToolImplementation for CompareSnapshotsTool {
    fn get_definition(&self) -> Tool {
        let squad = self.store.squad();
        definition(
            format!("compare_{}_snapshots", squad.slug()),
            format!(
                "Analytical tool: compares a new snapshot of a {}'s player data with the previously \
                 saved snapshot. Returns an object with 'added' and 'removed' player names and \
                 'attribute_changes' mapping each player to the fields that changed, with their \
                 old and new values. Returns null if no previous snapshot exists. Does not save \
                 the new snapshot.",
                squad.describe()
            ),
            Parameters::from_pairs(
                [
                    ("team_id", Property::integer("The ID of the team")),
                    (
                        "new_snapshot",
                        players_property("List of objects representing current full player data"),
                    ),
                ],
                &["team_id", "new_snapshot"],
            ),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;
        let fresh = args::collection(args, "new_snapshot")?;

        let changes = compare_with_snapshot(&self.store, &self.differ, team_id, &fresh)?;
        Ok(serde_json::to_string(&changes)?)
    }
}

/// Renders the output of the compare tool as text.
pub struct ReportChangesTool {
    squad: Squad,
}

impl ReportChangesTool {
    pub const fn new(squad: Squad) -> Self {
        Self { squad }
    }
}

#[async_trait]
impl ToolImplementation for ReportChangesTool {
    fn get_definition(&self) -> Tool {
        definition(
            format!("report_{}_changes", self.squad.slug()),
            format!(
                "Analytical tool: converts the output of compare_{}_snapshots into a readable text \
                 report summarizing new players, removed players and attribute changes.",
                self.squad.slug()
            ),
            Parameters::from_pairs(
                [(
                    "changes",
                    Property::object(
                        format!(
                            "The object returned by compare_{}_snapshots, or null",
                            self.squad.slug()
                        ),
                        BTreeMap::new(),
                        Vec::new(),
                    ),
                )],
                &[],
            ),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let changes = args::change_set(args, "changes")?;
        Ok(report(changes.as_ref()))
    }
}

/// Creates the four snapshot tools of one squad over a shared store.
#[must_use]
pub fn snapshot_tools(dir: impl Into<PathBuf>, squad: Squad) -> Vec<Arc<dyn ToolImplementation>> {
    let store = Arc::new(SnapshotStore::new(dir, squad));
    vec![
        Arc::new(SaveSnapshotTool::new(Arc::clone(&store))),
        Arc::new(LoadSnapshotTool::new(Arc::clone(&store))),
        Arc::new(CompareSnapshotsTool::new(store)),
        Arc::new(ReportChangesTool::new(squad)),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use touchline_memory::NO_BASELINE;

    fn tools(temp: &TempDir, squad: Squad) -> (SaveSnapshotTool, LoadSnapshotTool, CompareSnapshotsTool) {
        let store = Arc::new(SnapshotStore::new(temp.path(), squad));
        (
            SaveSnapshotTool::new(Arc::clone(&store)),
            LoadSnapshotTool::new(Arc::clone(&store)),
            CompareSnapshotsTool::new(store),
        )
    }

    #[tokio::test]
    async fn test_load_without_snapshot_returns_null() {
        let temp = TempDir::new().unwrap();
        let (_, load, _) = tools(&temp, Squad::Senior);

        let result = load.execute(&json!({"team_id": 57796})).await.unwrap();
        assert_eq!(result, "null");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let (save, load, _) = tools(&temp, Squad::Youth);

        let players = json!([{"name": "Sione Vake", "age": 18, "skills": {"speed": 9}}]);
        let saved = save
            .execute(&json!({"team_id": "57796", "players_data": players}))
            .await
            .unwrap();
        assert_eq!(saved, "true");
        assert!(temp.path().join("youth_team_57796.json").exists());

        let loaded: Value =
            serde_json::from_str(&load.execute(&json!({"team_id": 57796})).await.unwrap()).unwrap();
        assert_eq!(loaded, players);
    }

    #[tokio::test]
    async fn test_save_to_unusable_directory_returns_false() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let save = SaveSnapshotTool::new(Arc::new(SnapshotStore::new(&blocker, Squad::Senior)));

        let result = save
            .execute(&json!({"team_id": 1, "players_data": []}))
            .await
            .unwrap();
        assert_eq!(result, "false");
    }

    #[tokio::test]
    async fn test_save_rejects_malformed_arguments() {
        let temp = TempDir::new().unwrap();
        let (save, _, _) = tools(&temp, Squad::Senior);

        assert!(save.execute(&json!({"players_data": []})).await.is_err());
        assert!(
            save.execute(&json!({"team_id": 1, "players_data": {"name": "A"}}))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_compare_without_baseline_and_with_changes() {
        let temp = TempDir::new().unwrap();
        let (save, _, compare) = tools(&temp, Squad::Senior);

        let first = json!([{"name": "A", "form": 4, "skills": {"kicking": 5}}]);
        let result = compare
            .execute(&json!({"team_id": 9, "new_snapshot": first}))
            .await
            .unwrap();
        assert_eq!(result, "null");

        save.execute(&json!({"team_id": 9, "players_data": first}))
            .await
            .unwrap();

        let second = json!([
            {"name": "A", "form": 6, "skills": {"kicking": 5}},
            {"name": "B", "form": 3}
        ]);
        let result = compare
            .execute(&json!({"team_id": 9, "new_snapshot": second}))
            .await
            .unwrap();
        let changes: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(
            changes,
            json!({
                "added": ["B"],
                "removed": [],
                "attribute_changes": {"A": {"form": {"old": 4, "new": 6}}}
            })
        );
    }

    #[tokio::test]
    async fn test_compare_does_not_save() {
        let temp = TempDir::new().unwrap();
        let (save, load, compare) = tools(&temp, Squad::Senior);

        save.execute(&json!({"team_id": 3, "players_data": [{"name": "A"}]}))
            .await
            .unwrap();
        compare
            .execute(&json!({"team_id": 3, "new_snapshot": [{"name": "B"}]}))
            .await
            .unwrap();

        let loaded = load.execute(&json!({"team_id": 3})).await.unwrap();
        assert_eq!(loaded, r#"[{"name":"A"}]"#);
    }

    #[tokio::test]
    async fn test_report_tool() {
        let report_tool = ReportChangesTool::new(Squad::Senior);

        let text = report_tool.execute(&json!({"changes": null})).await.unwrap();
        assert_eq!(text, NO_BASELINE);

        let text = report_tool
            .execute(&json!({"changes": {
                "added": [],
                "removed": ["Old Hand"],
                "attribute_changes": {}
            }}))
            .await
            .unwrap();
        assert_eq!(
            text,
            "No new players added.\nPlayers removed:\n - Old Hand\nNo changes in player attributes detected."
        );
    }

    #[test]
    fn test_definitions_per_squad() {
        let tools = snapshot_tools("/tmp/unused", Squad::Youth);
        let names: Vec<String> = tools
            .iter()
            .map(|t| t.get_definition().function.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "save_youth_team_snapshot",
                "load_youth_team_snapshot",
                "compare_youth_team_snapshots",
                "report_youth_team_changes",
            ]
        );

        let save = tools[0].get_definition();
        assert!(save.function.description.contains("youth U20 team"));
        assert_eq!(
            save.function.parameters["required"],
            json!(["team_id", "players_data"])
        );
        assert_eq!(save.function.parameters["properties"]["players_data"]["type"], "array");
    }
}
