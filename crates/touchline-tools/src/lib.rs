//! # touchline-tools
//!
//! Tools a language-model agent can call to answer questions about a Blackout
//! Rugby team and to keep track of how its roster changes.
//!
//! ## Core Components
//!
//! - [`ToolImplementation`]: trait for a callable tool with a JSON schema
//! - [`ToolRegistry`]: thread-safe registry of tools keyed by name
//! - [`ToolExecutor`]: parses a [`ToolCall`] and dispatches it to its tool
//!
//! ## Tool Families
//!
//! - [`memory`]: save, load, compare and report roster snapshots
//! - [`track`]: fetch, compare, save and report in one call
//! - [`roster`], [`history`], [`training`], [`calendar`]: read-only API lookups
//!
//! Each snapshot tool exists twice, once per [`Squad`](touchline_common::Squad)
//! (`save_team_snapshot` and `save_youth_team_snapshot`, and so on).
//!
//! ## Example
//!
//! ```rust
//! use touchline_common::{Squad, ToolCall};
//! use touchline_tools::{ToolExecutor, memory::snapshot_tools};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut executor = ToolExecutor::new();
//! executor.add_tools(snapshot_tools("./memory/team_snapshots", Squad::Senior));
//!
//! let call = ToolCall::new("load_team_snapshot", r#"{"team_id": 57796}"#);
//! let snapshot = executor.execute_tool(&call).await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use touchline_client::BlackoutClient;
use touchline_common::{Function, FunctionCall, Parameters, RecordFetcher, Squad, Tool, ToolCall};
use touchline_memory::SnapshotStore;

pub mod args;
pub mod calendar;
pub mod history;
pub mod memory;
pub mod roster;
pub mod track;
pub mod training;

pub use calendar::{DateConverterTool, DateOutput};
pub use history::{PlayerHistoryDataTool, PlayerHistoryInfoTool};
pub use memory::{
    CompareSnapshotsTool, LoadSnapshotTool, ReportChangesTool, SaveSnapshotTool, snapshot_tools,
};
pub use roster::{PlayersDataTool, PlayersInfoTool};
pub use track::{TrackChangesTool, TrackOutcome, track_changes};
pub use training::TrainingHistoryTool;

const SQUADS: [Squad; 2] = [Squad::Senior, Squad::Youth];

/// Read-only Blackout Rugby lookups.
#[must_use]
pub fn api_tools(client: &Arc<BlackoutClient>) -> Vec<Arc<dyn ToolImplementation>> {
    let mut tools: Vec<Arc<dyn ToolImplementation>> = Vec::new();
    for squad in SQUADS {
        tools.push(Arc::new(PlayersDataTool::new(Arc::clone(client), squad)));
        tools.push(Arc::new(PlayersInfoTool::new(Arc::clone(client), squad)));
    }
    tools.push(Arc::new(PlayerHistoryDataTool::new(Arc::clone(client))));
    tools.push(Arc::new(PlayerHistoryInfoTool::new(Arc::clone(client))));
    tools.push(Arc::new(TrainingHistoryTool::new(Arc::clone(client))));
    tools.push(Arc::new(DateConverterTool::new(Arc::clone(client), DateOutput::Data)));
    tools.push(Arc::new(DateConverterTool::new(Arc::clone(client), DateOutput::Info)));
    tools
}

/// Snapshot and tracking tools for both squads, all stored under `dir`.
#[must_use]
pub fn memory_tools(
    dir: &Path,
    fetcher: &Arc<dyn RecordFetcher>,
) -> Vec<Arc<dyn ToolImplementation>> {
    let mut tools = Vec::new();
    for squad in SQUADS {
        tools.extend(snapshot_tools(dir, squad));
        tools.push(Arc::new(TrackChangesTool::new(
            Arc::clone(fetcher),
            Arc::new(SnapshotStore::new(dir, squad)),
        )) as Arc<dyn ToolImplementation>);
    }
    tools
}

/// An executor with every tool registered.
#[must_use]
pub fn full_executor(dir: &Path, client: Arc<BlackoutClient>) -> ToolExecutor {
    let mut executor = ToolExecutor::new();
    executor.add_tools(api_tools(&client));
    let fetcher: Arc<dyn RecordFetcher> = client;
    executor.add_tools(memory_tools(dir, &fetcher));
    executor
}

/// Builds the definition of a function tool.
pub(crate) fn definition(
    name: impl Into<String>,
    description: impl Into<String>,
    parameters: Parameters,
) -> Tool {
    Tool::builder()
        .function(Function {
            name: name.into(),
            description: description.into(),
            parameters: parameters.into(),
        })
        .build()
}

#[async_trait]
pub trait ToolImplementation: Send + Sync {
    fn get_definition(&self) -> Tool;

    async fn execute(&self, args: &Value) -> Result<String>;
}

pub struct ToolRegistry {
    tools: Arc<DashMap<String, Arc<dyn ToolImplementation>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(DashMap::new()),
        }
    }

    pub fn register(&self, tool: Arc<dyn ToolImplementation>) {
        let name = tool.get_definition().function.name;
        self.tools.insert(name, tool);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolImplementation>> {
        self.tools.get(name).map(|r| r.value().clone())
    }

    /// Definitions of every registered tool, sorted by name.
    #[must_use]
    pub fn get_all_definitions(&self) -> Vec<Tool> {
        let mut definitions: Vec<Tool> = self.tools.iter().map(|t| t.get_definition()).collect();
        definitions.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        definitions
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|t| t.key().clone()).collect();
        names.sort();
        names
    }
}

pub struct ToolExecutor {
    registry: ToolRegistry,
}

impl ToolExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
        }
    }

    pub fn add_tool<T: ToolImplementation + 'static>(&mut self, tool: T) {
        self.registry.register(Arc::new(tool));
    }

    pub fn add_tools(&mut self, tools: impl IntoIterator<Item = Arc<dyn ToolImplementation>>) {
        for tool in tools {
            self.registry.register(tool);
        }
    }

    #[must_use]
    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    #[must_use]
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.registry.get_all_definitions()
    }

    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    /// Execute a tool call.
    ///
    /// # Errors
    /// Returns an error if the tool is not found or if execution fails.
    pub async fn execute_tool(&self, tool_call: &ToolCall) -> Result<String> {
        let function = &tool_call.function;

        let tool = self
            .registry
            .get(&function.name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: '{}'", function.name))?;

        let args = Self::parse_arguments(function);

        tool.execute(&args).await
    }

    /// Arguments that are not valid JSON are handed to the tool as a string.
    fn parse_arguments(call: &FunctionCall) -> Value {
        let json = call.arguments_json();
        serde_json::from_str(json).unwrap_or_else(|_| Value::String(json.to_string()))
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}
