//! Plain-text summaries of API responses, meant for display rather than
//! further processing.

use std::fmt::Write as _;

use serde_json::Value;

/// Summarizes raw player objects as returned by
/// [`BlackoutClient::players_raw`](crate::BlackoutClient::players_raw).
#[must_use]
pub fn roster_summary(team_id: u64, players: &[Value]) -> String {
    if players.is_empty() {
        return format!("No players found for team {team_id}.");
    }

    let mut lines = vec![
        format!("Team {team_id} - Players\n"),
        format!("Total players: {}\n", players.len()),
    ];

    for p in players {
        let f = |field: &str| field_text(p, field);
        let mut block = String::new();
        let _ = writeln!(block, "{} {}", f("fname"), f("lname"));
        let _ = writeln!(
            block,
            " Age {} Form {} Agg {} Disc {} Lead {} Exp {}",
            f("age"),
            f("form"),
            f("aggression"),
            f("discipline"),
            f("leadership"),
            f("experience")
        );
        if let Some(salary) = p.get("salary") {
            let _ = writeln!(block, " Salary: {} CSR: {}", text(salary), f("csr"));
        }
        let _ = writeln!(block, " Energy: {}", f("energy"));
        let _ = writeln!(block, " Weight: {} Height: {}", f("weight"), f("height"));
        if let Some(stars) = p.get("scouting_stars_used") {
            let _ = writeln!(block, " Scouting Stars Used: {}", text(stars));
        }
        let _ = writeln!(
            block,
            "  Skills: Sta {}, Han {}, Att {}, Def {}, Tec {}, Str {}, Jmp {}, Spd {}, Agi {}, Kic {}",
            f("stamina"),
            f("handling"),
            f("attack"),
            f("defense"),
            f("technique"),
            f("strength"),
            f("jumping"),
            f("speed"),
            f("agility"),
            f("kicking")
        );
        lines.push(block);
    }

    lines.join("\n")
}

/// Summarizes the history entries of one player.
#[must_use]
pub fn history_summary(player_id: u64, entries: &[Value]) -> String {
    if entries.is_empty() {
        return format!("No player history found for player {player_id}.");
    }

    let mut lines = vec![
        format!("Player {player_id} - History\n"),
        format!("Total entries: {}\n", entries.len()),
    ];
    lines.extend(entries.iter().map(|entry| {
        format!(
            "ID: {} | Date: {} | Event: {}",
            field_text(entry, "id"),
            field_text(entry, "date"),
            field_text(entry, "event")
        )
    }));

    lines.join("\n")
}

fn field_text(object: &Value, field: &str) -> String {
    object.get(field).map_or_else(|| "?".to_string(), text)
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => "?".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
