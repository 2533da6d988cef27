//! # touchline-common
//!
//! Shared types for the touchline workspace.
//!
//! This crate holds the pieces every other crate agrees on:
//! - The roster data model: [`Record`], [`Collection`] and [`Squad`]
//! - The derived [`ChangeSet`] produced by comparing two rosters
//! - Tool-definition types handed to the language model
//! - The [`RecordFetcher`] boundary implemented by the HTTP client
//!
//! ## Example
//!
//! ```
//! use touchline_common::{ChangeSet, Record, Squad, identity_of};
//! use serde_json::json;
//!
//! let record: Record = serde_json::from_value(json!({
//!     "name": "Jonah Tapsell",
//!     "age": 19,
//!     "skills": { "kicking": 7 }
//! }))
//! .unwrap();
//!
//! assert_eq!(identity_of(&record, "name"), Some("Jonah Tapsell"));
//! assert_eq!(Squad::Youth.slug(), "youth_team");
//! assert!(ChangeSet::default().is_empty());
//! ```

/// Roster change-set types.
///
/// The result of comparing two snapshots: added, removed and changed players.
pub mod changes;
/// Boundary trait for whatever supplies a fresh roster.
pub mod fetcher;
/// Roster data model.
///
/// Records, collections, squads and the fixed set of tracked attributes.
pub mod roster;
/// Tool calling and function definition types.
pub mod tools;

pub use changes::{ChangeSet, FieldChange, RecordChanges};
pub use fetcher::RecordFetcher;
pub use roster::{
    Collection, IDENTITY_FIELD, Record, SKILLS_FIELD, Squad, TRACKED_ATTRIBUTES, identity_of,
};
pub use tools::{Function, FunctionCall, ObjectSchema, Parameters, Property, Tool, ToolCall};
