//! Roster lookups against the Blackout Rugby API.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use touchline_client::{BlackoutClient, roster_summary};
use touchline_common::{Parameters, Property, Squad, Tool};

use crate::{ToolImplementation, args, definition};

fn team_parameters() -> Parameters {
    Parameters::from_pairs(
        [("team_id", Property::integer("The identification number ID of the team"))],
        &["team_id"],
    )
}

/// Returns the reshaped roster of a squad as JSON, for analysis.
pub struct PlayersDataTool {
    client: Arc<BlackoutClient>,
    squad: Squad,
}

impl PlayersDataTool {
    pub const fn new(client: Arc<BlackoutClient>, squad: Squad) -> Self {
        Self { client, squad }
    }
}

#[async_trait]
impl ToolImplementation for PlayersDataTool {
    fn get_definition(&self) -> Tool {
        let extra = if self.squad.is_youth() {
            "scouting_stars_used (int)"
        } else {
            "salary (int), csr (int), contract_until (str)"
        };
        definition(
            format!("get_players_data_from_{}", self.squad.slug()),
            format!(
                "Returns structured player data for a {} as a list of objects with: id, team_id, \
                 first_name, last_name, name, age (int), nationality, form, aggression, discipline, \
                 leadership, experience, weight, height, energy (int), {extra} and skills (object \
                 of stamina, handling, attack, defense, technique, strength, jumping, speed, \
                 agility, kicking). This output is intended for computation and analysis.",
                self.squad.describe()
            ),
            team_parameters(),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;
        let roster = self.client.roster(team_id, self.squad).await?;
        Ok(serde_json::to_string(&roster)?)
    }
}

/// Returns a readable roster summary, for display.
pub struct PlayersInfoTool {
    client: Arc<BlackoutClient>,
    squad: Squad,
}

impl PlayersInfoTool {
    pub const fn new(client: Arc<BlackoutClient>, squad: Squad) -> Self {
        Self { client, squad }
    }
}

#[async_trait]
impl ToolImplementation for PlayersInfoTool {
    fn get_definition(&self) -> Tool {
        definition(
            format!("get_players_info_from_{}", self.squad.slug()),
            format!(
                "Returns a formatted, human-readable text summary of all players in a {}. This \
                 tool is intended for display only and is not suitable for programmatic analysis.",
                self.squad.describe()
            ),
            team_parameters(),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;
        let players = self.client.players_raw(team_id, self.squad).await?;
        Ok(roster_summary(team_id, &players))
    }
}
