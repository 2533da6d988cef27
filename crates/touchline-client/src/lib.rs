//! # touchline-client
//!
//! Client for the Blackout Rugby classic API.
//!
//! [`BlackoutClient`] wraps the handful of read-only operations the assistant
//! needs (rosters, player history, training reports, calendar dates) behind
//! one typed client with retry on transient failures. It also implements
//! [`touchline_common::RecordFetcher`], so the snapshot tools can pull a fresh
//! roster without knowing about HTTP.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use touchline_client::{BlackoutClient, ClientConfig, Credentials};
//! use touchline_common::Squad;
//!
//! # async fn example() -> Result<(), touchline_client::ClientError> {
//! let credentials = Credentials::load(Path::new("brkeys.json"))?;
//! let client = BlackoutClient::new(&ClientConfig::default(), credentials)?;
//! let roster = client.roster(57796, Squad::Youth).await?;
//! println!("{} players", roster.len());
//! # Ok(())
//! # }
//! ```

pub mod blackout;
pub mod credentials;
pub mod error;
pub mod players;
pub mod summary;

pub use blackout::{BlackoutClient, ClientConfig, DEFAULT_BASE_URL, TrainingReport};
pub use credentials::Credentials;
pub use error::ClientError;
pub use players::{SKILL_FIELDS, reshape_player};
pub use summary::{history_summary, roster_summary};
