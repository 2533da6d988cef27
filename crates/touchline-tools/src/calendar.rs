//! Conversion of in-game season, round and day to calendar dates.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use touchline_client::BlackoutClient;
use touchline_common::{Parameters, Property, Tool};

use crate::{ToolImplementation, args, definition};

fn date_parameters() -> Parameters {
    Parameters::from_pairs(
        [
            ("season", Property::integer("The season number")),
            ("round", Property::integer("The round number within the season")),
            ("day", Property::integer("The day number within the round")),
        ],
        &["season", "round", "day"],
    )
}

/// Which rendering the converter returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOutput {
    /// A bare `YYYY-MM-DD` string, for computation.
    Data,
    /// A sentence, for display.
    Info,
}

pub struct DateConverterTool {
    client: Arc<BlackoutClient>,
    output: DateOutput,
}

impl DateConverterTool {
    pub const fn new(client: Arc<BlackoutClient>, output: DateOutput) -> Self {
        Self { client, output }
    }
}

#[async_trait]
impl ToolImplementation for DateConverterTool {
    fn get_definition(&self) -> Tool {
        let (suffix, usage) = match self.output {
            DateOutput::Data => ("data", "Returns the date as YYYY-MM-DD for computation."),
            DateOutput::Info => ("info", "Returns a readable sentence, for display only."),
        };
        definition(
            format!("date_converter_from_season_round_day_to_date_{suffix}"),
            format!(
                "Converts a Blackout Rugby season, round and day into the corresponding calendar \
                 date. {usage}"
            ),
            date_parameters(),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let season = args::small_integer(args, "season")?;
        let round = args::small_integer(args, "round")?;
        let day = args::small_integer(args, "day")?;

        let date = self.client.game_date(season, round, day).await?;
        Ok(match self.output {
            DateOutput::Data => date.to_string(),
            DateOutput::Info => {
                format!("Season {season}, round {round}, day {day} falls on {date}.")
            }
        })
    }
}
