//! Command implementations.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use tracing::{info, warn};

use touchline_client::{BlackoutClient, Credentials};
use touchline_common::{Collection, Squad, ToolCall};
use touchline_memory::{SnapshotDiffer, SnapshotStore, compare_with_snapshot, report as render};
use touchline_tools::{ToolExecutor, full_executor, snapshot_tools, track_changes};

use crate::config::Config;
use crate::display;

fn store(config: &Config, squad: Squad) -> Result<SnapshotStore> {
    Ok(SnapshotStore::new(config.snapshot_dir()?, squad))
}

/// Reads a JSON array of player objects.
fn read_collection(path: &Path) -> Result<Collection> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of player objects", path.display()))
}

fn client(config: &Config) -> Result<Arc<BlackoutClient>> {
    let credentials = Credentials::load(&config.credentials_file()?)?;
    Ok(Arc::new(BlackoutClient::new(
        &config.client_config(),
        credentials,
    )?))
}

/// Every tool when credentials are available, the snapshot tools otherwise.
fn executor(config: &Config) -> Result<ToolExecutor> {
    let dir = config.snapshot_dir()?;
    match client(config) {
        Ok(client) => Ok(full_executor(&dir, client)),
        Err(e) => {
            warn!("API tools unavailable: {e:#}");
            let mut executor = ToolExecutor::new();
            executor.add_tools(snapshot_tools(&dir, Squad::Senior));
            executor.add_tools(snapshot_tools(&dir, Squad::Youth));
            Ok(executor)
        }
    }
}

pub fn save(config: &Config, team_id: u64, squad: Squad, file: &Path) -> Result<()> {
    let players = read_collection(file)?;
    let store = store(config, squad)?;

    if !store.save(team_id, &players) {
        bail!(
            "Failed to save {squad} snapshot of team {team_id} to {}",
            store.snapshot_path(team_id).display()
        );
    }

    println!(
        "{} {squad} snapshot of team {team_id} ({} players)",
        "Saved".green().bold(),
        players.len()
    );
    Ok(())
}

pub fn load(config: &Config, team_id: u64, squad: Squad) -> Result<()> {
    let snapshot = store(config, squad)?.load(team_id)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

pub fn diff(config: &Config, team_id: u64, squad: Squad, file: &Path) -> Result<()> {
    let fresh = read_collection(file)?;
    let changes = compare_with_snapshot(
        &store(config, squad)?,
        &SnapshotDiffer::default(),
        team_id,
        &fresh,
    )?;
    println!("{}", serde_json::to_string_pretty(&changes)?);
    Ok(())
}

pub fn report(config: &Config, team_id: u64, squad: Squad, file: &Path, save: bool) -> Result<()> {
    let fresh = read_collection(file)?;
    let store = store(config, squad)?;
    let changes = compare_with_snapshot(&store, &SnapshotDiffer::default(), team_id, &fresh)?;

    println!("{}", render(changes.as_ref()));

    if save {
        if !store.save(team_id, &fresh) {
            bail!("Failed to save {squad} snapshot of team {team_id}");
        }
        info!("Saved {squad} snapshot of team {team_id}");
    }
    Ok(())
}

pub async fn track(config: &Config, team_id: u64, squad: Squad, save: bool) -> Result<()> {
    let client = client(config)?;
    let store = store(config, squad)?;

    let outcome =
        track_changes(client.as_ref(), &store, &SnapshotDiffer::default(), team_id, save).await?;
    println!("{}", outcome.render(save));
    Ok(())
}

pub fn list_tools(config: &Config, json: bool) -> Result<()> {
    let executor = executor(config)?;
    let tools = executor.get_all_tools();

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
    } else {
        for tool in &tools {
            display::print_tool(tool);
        }
    }
    Ok(())
}

pub async fn call(config: &Config, tool: &str, args: &str) -> Result<()> {
    let executor = executor(config)?;
    let result = executor.execute_tool(&ToolCall::new(tool, args)).await?;
    println!("{result}");
    Ok(())
}
