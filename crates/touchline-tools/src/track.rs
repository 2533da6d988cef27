//! One-call change tracking: fetch the current roster, compare it with the
//! stored snapshot, optionally save it as the new baseline and report.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;

use touchline_common::{ChangeSet, Parameters, Property, RecordFetcher, Tool};
use touchline_memory::{SnapshotDiffer, SnapshotStore, compare_with_snapshot, report};

use crate::{ToolImplementation, args, definition};

/// Appended to the report when the fresh roster could not be saved.
pub const SAVE_FAILED: &str = "Warning: the new snapshot could not be saved.";

/// Result of one tracking run.
#[derive(Debug, Clone)]
pub struct TrackOutcome {
    /// `None` when there was no previous snapshot.
    pub changes: Option<ChangeSet>,
    /// Number of players in the fetched roster.
    pub roster_size: usize,
    /// Whether the fetched roster was written as the new snapshot.
    pub saved: bool,
}

impl TrackOutcome {
    /// The change report, with a warning line when saving was requested but
    /// failed.
    #[must_use]
    pub fn render(&self, save_requested: bool) -> String {
        let text = report(self.changes.as_ref());
        if save_requested && !self.saved {
            format!("{text}\n{SAVE_FAILED}")
        } else {
            text
        }
    }
}

/// Fetches the roster of `team_id`, diffs it against the stored snapshot
/// and, when `save` is set, replaces the snapshot with it.
///
/// The comparison always runs against the snapshot as it was before this
/// call.
///
/// # Errors
///
/// Returns an error if the fetch fails or the stored snapshot is unreadable.
pub async fn track_changes(
    fetcher: &dyn RecordFetcher,
    store: &SnapshotStore,
    differ: &SnapshotDiffer,
    team_id: u64,
    save: bool,
) -> Result<TrackOutcome> {
    let fresh = fetcher.fetch_roster(team_id, store.squad()).await?;
    let changes = compare_with_snapshot(store, differ, team_id, &fresh)?;

    let saved = save && store.save(team_id, &fresh);
    if save && !saved {
        warn!("Tracked team {team_id} but could not save the new snapshot");
    }

    info!(
        "Tracked {} roster of team {team_id}: {} players, {}",
        store.squad(),
        fresh.len(),
        match &changes {
            None => "no baseline",
            Some(c) if c.is_empty() => "no changes",
            Some(_) => "changes found",
        }
    );

    Ok(TrackOutcome {
        changes,
        roster_size: fresh.len(),
        saved,
    })
}

/// Tool wrapper around [`track_changes`].
pub struct TrackChangesTool {
    fetcher: Arc<dyn RecordFetcher>,
    store: Arc<SnapshotStore>,
    differ: SnapshotDiffer,
}

impl TrackChangesTool {
    pub fn new(fetcher: Arc<dyn RecordFetcher>, store: Arc<SnapshotStore>) -> Self {
        Self {
            fetcher,
            store,
            differ: SnapshotDiffer::default(),
        }
    }
}

#[async_trait]
impl ToolImplementation for TrackChangesTool {
    fn get_definition(&self) -> Tool {
        let squad = self.store.squad();
        definition(
            format!("track_{}_changes", squad.slug()),
            format!(
                "Analytical tool: fetches the current players of a {}, compares them with the last \
                 saved snapshot and returns a readable report of new players, removed players and \
                 attribute changes. By default the current roster then becomes the saved snapshot.",
                squad.describe()
            ),
            Parameters::from_pairs(
                [
                    ("team_id", Property::integer("The identification number ID of the team")),
                    (
                        "save",
                        Property::boolean(
                            "Save the current roster as the new snapshot (default true)",
                        ),
                    ),
                ],
                &["team_id"],
            ),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;
        let save = args::flag(args, "save", true)?;

        let outcome =
            track_changes(self.fetcher.as_ref(), &self.store, &self.differ, team_id, save).await?;
        Ok(outcome.render(save))
    }
}
