//! Snapshot persistence.
//!
//! One JSON file per team and squad, all in a single directory chosen by the
//! caller:
//!
//! ```text
//! <snapshot_dir>/
//! ├── team_57796.json          (senior roster of team 57796)
//! └── youth_team_57796.json    (U20 roster of team 57796)
//! ```
//!
//! Files hold a pretty-printed JSON array of player objects so operators can
//! read them directly.
//!
//! There is no locking. Each save writes its own uniquely named temporary
//! file and renames it into place, so two concurrent saves for the same team
//! each publish a complete roster and the last rename wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use tracing::{debug, error, instrument};

use touchline_common::{Collection, Record, Squad};

use crate::error::{MemoryError, Result};

/// Reads and writes the latest roster snapshot of each team.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    squad: Squad,
}

impl SnapshotStore {
    /// Creates a store rooted at `dir` for one squad.
    ///
    /// The directory is created lazily on the first save.
    pub fn new(dir: impl Into<PathBuf>, squad: Squad) -> Self {
        Self {
            dir: dir.into(),
            squad,
        }
    }

    #[must_use]
    pub const fn squad(&self) -> Squad {
        self.squad
    }

    /// Returns the file that holds the snapshot of `entity_id`.
    #[must_use]
    pub fn snapshot_path(&self, entity_id: u64) -> PathBuf {
        self.dir
            .join(format!("{}_{entity_id}.json", self.squad.slug()))
    }

    /// Replaces the snapshot of `entity_id` with `collection`.
    ///
    /// Writes to a temporary file and renames it over the previous snapshot,
    /// so a failed write leaves the old file intact. Failures are logged and
    /// reported as `false`; they never propagate.
    #[instrument(skip(self, collection), fields(squad = %self.squad, records = collection.len()))]
    pub fn save(&self, entity_id: u64, collection: &[Record]) -> bool {
        match self.write_snapshot(entity_id, collection) {
            Ok(path) => {
                debug!(entity_id, path = %path.display(), "Saved snapshot");
                true
            }
            Err(e) => {
                error!(entity_id, error = %e, "Error saving snapshot");
                false
            }
        }
    }

    fn write_snapshot(&self, entity_id: u64, collection: &[Record]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| MemoryError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.snapshot_path(entity_id);
        let temp_path = self.dir.join(format!(
            ".{}_{entity_id}.{}.tmp",
            self.squad.slug(),
            Uuid::new_v4().simple()
        ));
        Self::write_via(&path, &temp_path, collection)?;

        Ok(path)
    }

    fn write_via(path: &Path, temp_path: &Path, collection: &[Record]) -> Result<()> {
        let json = serde_json::to_string_pretty(collection)?;

        let written = fs::write(temp_path, &json).and_then(|()| fs::rename(temp_path, path));
        if let Err(source) = written {
            // Best effort; the previous snapshot is untouched either way.
            let _ = fs::remove_file(temp_path);
            return Err(MemoryError::Write {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(())
    }

    /// Loads the snapshot of `entity_id`.
    ///
    /// Returns `Ok(None)` when no snapshot was ever saved for this team,
    /// which is distinct from a saved empty roster (`Ok(Some(vec![]))`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if its
    /// content is not a JSON array of objects.
    #[instrument(skip(self), fields(squad = %self.squad))]
    pub fn load(&self, entity_id: u64) -> Result<Option<Collection>> {
        let path = self.snapshot_path(entity_id);

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(entity_id, "No previous snapshot");
                return Ok(None);
            }
            Err(source) => return Err(MemoryError::Read { path, source }),
        };

        let collection: Collection = match serde_json::from_str(&json) {
            Ok(collection) => collection,
            Err(source) => return Err(MemoryError::Corrupt { path, source }),
        };

        debug!(entity_id, records = collection.len(), "Loaded snapshot");

        Ok(Some(collection))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn collection(value: Value) -> Collection {
        serde_json::from_value(value).unwrap()
    }

    fn roster() -> Collection {
        collection(json!([
            {
                "name": "Tevita Lolo",
                "age": 24,
                "form": 6,
                "skills": {"stamina": 12, "kicking": null, "attack": "9"}
            },
            {"name": "Hemi Rangi", "age": 31, "csr": 120_500}
        ]))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);

        assert!(store.save(57796, &roster()));

        let loaded = store.load(57796).unwrap().unwrap();
        assert_eq!(loaded, roster());
        // nested mappings keep their key order
        let skills: Vec<&String> = loaded[0]["skills"].as_object().unwrap().keys().collect();
        assert_eq!(skills, vec!["stamina", "kicking", "attack"]);
    }

    #[test]
    fn test_load_absent_is_none() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);

        assert!(store.load(1).unwrap().is_none());
    }

    #[test]
    fn test_empty_collection_is_not_absent() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);

        assert!(store.save(1, &[]));
        assert_eq!(store.load(1).unwrap(), Some(vec![]));
    }

    #[test]
    fn test_save_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("memory").join("team_snapshots");
        let store = SnapshotStore::new(&dir, Squad::Senior);

        assert!(store.save(7, &roster()));
        assert!(dir.join("team_7.json").is_file());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);

        assert!(store.save(3, &roster()));
        let replacement = collection(json!([{"name": "Only One"}]));
        assert!(store.save(3, &replacement));

        assert_eq!(store.load(3).unwrap().unwrap(), replacement);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_squads_use_separate_files() {
        let temp = TempDir::new().unwrap();
        let senior = SnapshotStore::new(temp.path(), Squad::Senior);
        let youth = SnapshotStore::new(temp.path(), Squad::Youth);

        assert!(senior.save(9, &roster()));
        assert!(youth.load(9).unwrap().is_none());
        assert!(
            youth
                .snapshot_path(9)
                .ends_with("youth_team_9.json")
        );
    }

    #[test]
    fn test_failed_write_keeps_prior_snapshot() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);
        assert!(store.save(5, &roster()));

        // A directory squatting on the temp path makes the write fail.
        let temp_path = temp.path().join(".team_5.blocked.tmp");
        fs::create_dir(&temp_path).unwrap();

        let result = SnapshotStore::write_via(
            &store.snapshot_path(5),
            &temp_path,
            &collection(json!([{"name": "New"}])),
        );
        assert!(matches!(result, Err(MemoryError::Write { .. })));
        assert_eq!(store.load(5).unwrap().unwrap(), roster());
    }

    #[test]
    fn test_concurrent_saves_publish_a_complete_roster() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Youth);
        let rosters: Vec<Collection> = (0..8)
            .map(|i| collection(json!([{"name": format!("P{i}"), "age": i}])))
            .collect();

        std::thread::scope(|scope| {
            for roster in &rosters {
                let store = &store;
                scope.spawn(move || assert!(store.save(2, roster)));
            }
        });

        let stored = store.load(2).unwrap().unwrap();
        assert!(rosters.contains(&stored));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_unusable_directory_returns_false() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();
        let store = SnapshotStore::new(&blocker, Squad::Senior);

        assert!(!store.save(1, &roster()));
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);
        fs::write(store.snapshot_path(11), "{ not json").unwrap();

        assert!(matches!(
            store.load(11),
            Err(MemoryError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);
        fs::write(store.snapshot_path(12), r#"{"name": "not an array"}"#).unwrap();

        assert!(matches!(
            store.load(12),
            Err(MemoryError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_unreadable_snapshot_is_read_error() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path(), Squad::Senior);
        fs::create_dir(store.snapshot_path(13)).unwrap();

        assert!(matches!(store.load(13), Err(MemoryError::Read { .. })));
    }
}
