//! Weekly training report lookups.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use touchline_client::BlackoutClient;
use touchline_common::{Parameters, Property, Tool};

use crate::{ToolImplementation, args, definition};

pub struct TrainingHistoryTool {
    client: Arc<BlackoutClient>,
}

impl TrainingHistoryTool {
    pub const fn new(client: Arc<BlackoutClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolImplementation for TrainingHistoryTool {
    fn get_definition(&self) -> Tool {
        definition(
            "get_team_training_history_data",
            "Returns the training report of a team for one round as a list of two objects: \
             'team', whose 'skill' key lists the four skills trained that week, and 'players', \
             keyed by player ID, each holding 'id', 'drops' and 'pops' (skills that dropped or \
             improved), and the changes in 'csr' and 'energy'. This output is intended for \
             computation and analysis.",
            Parameters::from_pairs(
                [
                    ("team_id", Property::integer("The identification number ID of the team")),
                    ("season", Property::integer("The season number")),
                    ("round", Property::integer("The round number within the season")),
                ],
                &["team_id", "season", "round"],
            ),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let team_id = args::integer(args, "team_id")?;
        let season = args::small_integer(args, "season")?;
        let round = args::small_integer(args, "round")?;

        let report = self.client.training_report(team_id, season, round).await?;
        Ok(serde_json::to_string(&report.into_pair())?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use serde_json::json;
    use touchline_client::{ClientConfig, Credentials};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_training_report_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("r", "tr"))
            .and(query_param("teamid", "57796"))
            .and(query_param("season", "59"))
            .and(query_param("round", "13"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "report": {"report": {
                    "team": {"skill": ["kicking"]},
                    "individual": {"players": {"9": {"id": "9", "drops": []}}}
                }}
            })))
            .mount(&server)
            .await;

        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(0);
        let client = Arc::new(BlackoutClient::new(&config, Credentials::new("1", "key")).unwrap());
        let tool = TrainingHistoryTool::new(client);

        let output = tool
            .execute(&json!({"team_id": 57796, "season": "59", "round": 13}))
            .await
            .unwrap();
        let pair: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            pair,
            json!([{"skill": ["kicking"]}, {"9": {"id": "9", "drops": []}}])
        );
    }

    #[tokio::test]
    async fn test_missing_round_is_rejected() {
        let config = ClientConfig::default().with_max_retries(0);
        let client = Arc::new(BlackoutClient::new(&config, Credentials::new("1", "key")).unwrap());
        let tool = TrainingHistoryTool::new(client);

        let err = tool
            .execute(&json!({"team_id": 1, "season": 59}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Missing 'round'"));
    }
}
