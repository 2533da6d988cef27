//! # touchline-memory
//!
//! Roster snapshot tracking: persist the latest roster of a team, compare a
//! fresh roster against it and describe what changed.
//!
//! ## Components
//!
//! - [`SnapshotStore`]: one JSON snapshot per team and squad on disk
//! - [`SnapshotDiffer`] / [`diff`]: added, removed and changed players
//! - [`report`]: deterministic text rendering of a [`ChangeSet`]
//!
//! ## Example
//!
//! ```no_run
//! use touchline_common::Squad;
//! use touchline_memory::{SnapshotDiffer, SnapshotStore, compare_with_snapshot, report};
//!
//! # fn example(fresh: Vec<touchline_common::Record>) -> touchline_memory::Result<()> {
//! let store = SnapshotStore::new("./memory/team_snapshots", Squad::Senior);
//! let changes = compare_with_snapshot(&store, &SnapshotDiffer::default(), 57796, &fresh)?;
//! println!("{}", report(changes.as_ref()));
//! store.save(57796, &fresh);
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod error;
pub mod report;
pub mod store;

pub use diff::{SnapshotDiffer, diff};
pub use error::{MemoryError, Result};
pub use report::{NO_BASELINE, render_value, report};
pub use store::SnapshotStore;

use touchline_common::{ChangeSet, Record};

/// Loads the stored snapshot of `entity_id` and diffs `fresh` against it.
///
/// Returns `Ok(None)` when no snapshot exists yet.
///
/// # Errors
///
/// Returns an error if the stored snapshot cannot be read or is corrupt.
pub fn compare_with_snapshot(
    store: &SnapshotStore,
    differ: &SnapshotDiffer,
    entity_id: u64,
    fresh: &[Record],
) -> Result<Option<ChangeSet>> {
    let previous = store.load(entity_id)?;
    Ok(differ.diff(previous.as_deref(), fresh))
}
