//! HTTP client for the Blackout Rugby classic API.
//!
//! Every operation is a single GET on the API root with query parameters:
//! the credentials (`d`, `dk`, `m`, `mk`), the request code `r`, `json=1`
//! and operation-specific parameters. Responses carry a `status` field that
//! must be `"Ok"`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use touchline_common::{Collection, RecordFetcher, Squad};

use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::players::reshape_player;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "http://classic-api.blackoutrugby.com";

type Result<T> = std::result::Result<T, ClientError>;

/// Connection settings for [`BlackoutClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` disables the request timeout.
    pub timeout: Option<Duration>,
    /// Retries for transient failures (connection errors, 5xx).
    pub max_retries: u32,
    pub initial_retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(30)),
            max_retries: 3,
            initial_retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Training report of one team for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingReport {
    /// Team-level details, including the trained `skill` list.
    pub team: Value,
    /// Per-player training outcome keyed by player id.
    pub players: Value,
}

impl TrainingReport {
    /// The `[team, players]` pair handed to the agent.
    #[must_use]
    pub fn into_pair(self) -> Value {
        Value::Array(vec![self.team, self.players])
    }
}

/// Blackout Rugby API client.
///
/// One method per API operation; credentials are passed in explicitly at
/// construction.
#[derive(Clone)]
pub struct BlackoutClient {
    http: ClientWithMiddleware,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl std::fmt::Debug for BlackoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlackoutClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BlackoutClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::ConfigurationError(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.initial_retry_delay, config.max_retry_delay)
            .build_with_max_retries(config.max_retries);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = reqwest_middleware::ClientBuilder::new(builder.build()?)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            base_url,
            credentials: Arc::new(credentials),
        })
    }

    /// Sends request `operation` and returns the response object.
    async fn request(&self, operation: &str, params: &[(&str, String)]) -> Result<Map<String, Value>> {
        let creds = &self.credentials;
        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 6);
        if let Some(dev_id) = &creds.dev_id {
            query.push(("d", dev_id.clone()));
        }
        if let Some(dev_key) = &creds.dev_key {
            query.push(("dk", dev_key.expose_secret().to_string()));
        }
        query.push(("r", operation.to_string()));
        if let Some(member_id) = &creds.member_id {
            query.push(("m", member_id.clone()));
        }
        query.push(("mk", creds.access_key.expose_secret().to_string()));
        query.push(("json", "1".to_string()));
        query.extend(params.iter().cloned());

        debug!("BR API request r={operation}");

        let response = self
            .http
            .get(self.base_url.clone())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("BR API request r={operation} failed with HTTP {}", status.as_u16());
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let data: Map<String, Value> = serde_json::from_str(&text)?;

        match data.get("status").and_then(Value::as_str) {
            Some("Ok") => Ok(data),
            other => {
                let status = other.map_or_else(|| "missing status".to_string(), ToString::to_string);
                error!("BR API request r={operation} returned status {status}");
                Err(ClientError::Api(status))
            }
        }
    }

    /// Raw player objects of a squad, in response order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn players_raw(&self, team_id: u64, squad: Squad) -> Result<Vec<Value>> {
        let mut params = vec![("teamid", team_id.to_string())];
        if squad.is_youth() {
            params.push(("youth", "1".to_string()));
        }

        let mut data = self.request("p", &params).await?;
        Ok(values_of(data.remove("players")))
    }

    /// The squad's roster reshaped into snapshot records.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn roster(&self, team_id: u64, squad: Squad) -> Result<Collection> {
        let players = self.players_raw(team_id, squad).await?;
        Ok(players.iter().map(|p| reshape_player(p, squad)).collect())
    }

    /// History entries of one player (`id`, `date`, `event`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn player_history(&self, player_id: u64) -> Result<Vec<Value>> {
        let mut data = self
            .request("ph", &[("playerid", player_id.to_string())])
            .await?;
        Ok(values_of(data.remove("entries")))
    }

    /// Training report of a team for one season round.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn training_report(&self, team_id: u64, season: u32, round: u32) -> Result<TrainingReport> {
        let data = self
            .request(
                "tr",
                &[
                    ("teamid", team_id.to_string()),
                    ("season", season.to_string()),
                    ("round", round.to_string()),
                ],
            )
            .await?;

        let report = data
            .get("report")
            .and_then(|r| r.get("report"))
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(TrainingReport {
            team: report
                .get("team")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            players: report
                .get("individual")
                .and_then(|i| i.get("players"))
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
        })
    }

    /// Calendar date of an in-game season, round and day.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response holds no
    /// `YYYY-MM-DD` date.
    pub async fn game_date(&self, season: u32, round: u32, day: u32) -> Result<NaiveDate> {
        let data = self
            .request(
                "dt",
                &[
                    ("season", season.to_string()),
                    ("round", round.to_string()),
                    ("day", day.to_string()),
                ],
            )
            .await?;

        let raw = data
            .get("date")
            .and_then(|d| d.get(0))
            .and_then(|d| d.get("date"))
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::InvalidResponse("missing date[0].date".to_string()))?;

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| ClientError::InvalidResponse(format!("invalid date '{raw}': {e}")))
    }
}

#[async_trait]
impl RecordFetcher for BlackoutClient {
    async fn fetch_roster(&self, team_id: u64, squad: Squad) -> AnyResult<Collection> {
        Ok(self.roster(team_id, squad).await?)
    }
}

/// The API returns collections either as id-keyed objects or as arrays.
fn values_of(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(uri: &str) -> BlackoutClient {
        let config = ClientConfig::default()
            .with_base_url(uri)
            .with_max_retries(0);
        let credentials = Credentials::new("99", "member-key").with_developer("7", "dev-key");
        BlackoutClient::new(&config, credentials).unwrap()
    }

    #[tokio::test]
    async fn test_youth_roster_request_and_reshape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("r", "p"))
            .and(query_param("teamid", "57796"))
            .and(query_param("youth", "1"))
            .and(query_param("m", "99"))
            .and(query_param("mk", "member-key"))
            .and(query_param("d", "7"))
            .and(query_param("dk", "dev-key"))
            .and(query_param("json", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "players": {
                    "1001": {
                        "id": "1001", "teamid": "57796", "fname": "Sione", "lname": "Vake",
                        "name": "Sione Vake", "age": "18", "nationality": "TO",
                        "form": "5", "energy": "100", "scouting_stars_used": "2",
                        "stamina": "3", "kicking": "6"
                    },
                    "1002": {
                        "id": "1002", "name": "Liam Cotter", "age": "17",
                        "scouting_stars_used": "0"
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let roster = client.roster(57796, Squad::Youth).await.unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0]["name"], "Sione Vake");
        assert_eq!(roster[0]["age"], 18);
        assert_eq!(roster[0]["skills"]["kicking"], "6");
        assert!(roster[0].get("salary").is_none());
        assert_eq!(roster[1]["name"], "Liam Cotter");
        assert_eq!(roster[1]["form"], 0);
    }

    #[tokio::test]
    async fn test_senior_roster_omits_youth_flag() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("r", "p"))
            .and(query_param_is_missing("youth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "players": [{"name": "Tama Hohaia", "salary": "12000", "contract": "2025-06-01T00:00:00"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let roster = client.fetch_roster(1, Squad::Senior).await.unwrap();

        assert_eq!(roster[0]["salary"], 12_000);
        assert_eq!(roster[0]["contract_until"], "2025-06-01");
    }

    #[tokio::test]
    async fn test_missing_credentials_are_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param_is_missing("d"))
            .and(query_param_is_missing("dk"))
            .and(query_param_is_missing("m"))
            .and(query_param("mk", "only-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "entries": []
            })))
            .mount(&server)
            .await;

        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(0);
        let credentials: Credentials =
            serde_json::from_value(json!({"ACCESS_KEY": "only-key"})).unwrap();
        let client = BlackoutClient::new(&config, credentials).unwrap();

        assert!(client.player_history(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "Invalid member access key"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.player_history(5).await.unwrap_err();
        assert!(matches!(err, ClientError::Api(ref s) if s == "Invalid member access key"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.players_raw(1, Squad::Senior).await.unwrap_err();
        assert!(matches!(err, ClientError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_player_history_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("r", "ph"))
            .and(query_param("playerid", "321"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "entries": [
                    {"id": "1", "date": "2024-02-01", "event": "Signed"},
                    {"id": "2", "date": "2024-03-01", "event": "Debut"}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let entries = client.player_history(321).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["event"], "Debut");
    }

    #[tokio::test]
    async fn test_training_report() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("r", "tr"))
            .and(query_param("season", "59"))
            .and(query_param("round", "13"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "report": {"report": {
                    "team": {"skill": ["speed", "agility", "attack", "defense"]},
                    "individual": {"players": {"1001": {"id": "1001", "pops": ["speed"]}}}
                }}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let report = client.training_report(57796, 59, 13).await.unwrap();
        assert_eq!(report.team["skill"][0], "speed");
        assert_eq!(report.players["1001"]["pops"][0], "speed");

        let pair = report.into_pair();
        assert_eq!(pair.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_training_report_missing_sections() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Ok"})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let report = client.training_report(1, 1, 1).await.unwrap();
        assert_eq!(report.team, json!({}));
        assert_eq!(report.players, json!({}));
    }

    #[tokio::test]
    async fn test_game_date() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("r", "dt"))
            .and(query_param("day", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Ok",
                "date": [{"date": "2024-11-08"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let date = client.game_date(59, 13, 5).await.unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 8).unwrap());
    }

    #[tokio::test]
    async fn test_game_date_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "Ok", "date": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.game_date(59, 13, 5).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::default().with_base_url("not a url");
        let err = BlackoutClient::new(&config, Credentials::new("1", "k")).unwrap_err();
        assert!(matches!(err, ClientError::ConfigurationError(_)));
    }
}
