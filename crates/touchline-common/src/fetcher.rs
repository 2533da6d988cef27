use anyhow::Result;
use async_trait::async_trait;

use crate::roster::{Collection, Squad};

/// Supplies the current roster of a team.
///
/// The snapshot subsystem only sees the returned [`Collection`]; how it was
/// obtained (remote API, file, test fixture) is up to the implementation.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetches the current roster of `team_id` for the given squad.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be obtained.
    async fn fetch_roster(&self, team_id: u64, squad: Squad) -> Result<Collection>;
}
