//! Player history lookups.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use touchline_client::{BlackoutClient, history_summary};
use touchline_common::{Parameters, Property, Tool};

use crate::{ToolImplementation, args, definition};

fn player_parameters() -> Parameters {
    Parameters::from_pairs(
        [("player_id", Property::integer("The identification number ID of the player"))],
        &["player_id"],
    )
}

/// History entries of a player as JSON.
pub struct PlayerHistoryDataTool {
    client: Arc<BlackoutClient>,
}

impl PlayerHistoryDataTool {
    pub const fn new(client: Arc<BlackoutClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolImplementation for PlayerHistoryDataTool {
    fn get_definition(&self) -> Tool {
        definition(
            "get_player_history_data",
            "Returns the history of a player as a list of entries, each with 'id', 'date' and \
             'event'. This output is intended for computation and analysis.",
            player_parameters(),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let player_id = args::integer(args, "player_id")?;
        let entries = self.client.player_history(player_id).await?;
        Ok(serde_json::to_string(&entries)?)
    }
}

/// History of a player as readable text.
pub struct PlayerHistoryInfoTool {
    client: Arc<BlackoutClient>,
}

impl PlayerHistoryInfoTool {
    pub const fn new(client: Arc<BlackoutClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolImplementation for PlayerHistoryInfoTool {
    fn get_definition(&self) -> Tool {
        definition(
            "get_player_history_info",
            "Returns a formatted, human-readable text summary of a player's history. This tool \
             is intended for display only.",
            player_parameters(),
        )
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let player_id = args::integer(args, "player_id")?;
        let entries = self.client.player_history(player_id).await?;
        Ok(history_summary(player_id, &entries))
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

    async fn history_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("r", "ph"))
            .and(query_param("playerid", "77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "entries": [{"id": "1", "date": "2024-05-02", "event": "Joined the club"}]
            })))
            .mount(&server)
            .await;
        server
    }

    fn client(server: &MockServer) -> Arc<BlackoutClient> {
        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(0);
        Arc::new(BlackoutClient::new(&config, Credentials::new("1", "key")).unwrap())
    }

    #[tokio::test]
    async fn test_history_data() {
        let server = history_server().await;
        let tool = PlayerHistoryDataTool::new(client(&server));

        let output = tool.execute(&json!({"player_id": 77})).await.unwrap();
        let entries: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(entries[0]["event"], "Joined the club");
    }

    #[tokio::test]
    async fn test_history_info() {
        let server = history_server().await;
        let tool = PlayerHistoryInfoTool::new(client(&server));

        let output = tool.execute(&json!({"player_id": 77})).await.unwrap();
        assert!(output.ends_with("ID: 1 | Date: 2024-05-02 | Event: Joined the club"));
    }
}
