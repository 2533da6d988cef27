//! Reshaping of raw API player objects into snapshot records.

use log::warn;
use serde_json::{Map, Value};

use touchline_common::{Record, SKILLS_FIELD, Squad};

/// Skill fields moved under the nested `skills` mapping, in output order.
pub const SKILL_FIELDS: [&str; 10] = [
    "stamina",
    "handling",
    "attack",
    "defense",
    "technique",
    "strength",
    "jumping",
    "speed",
    "agility",
    "kicking",
];

/// Integer attributes that default to 0 when the API omits them.
const COUNTED_FIELDS: [&str; 8] = [
    "form",
    "aggression",
    "discipline",
    "leadership",
    "experience",
    "weight",
    "height",
    "energy",
];

/// Builds the snapshot record of one raw player.
///
/// Integer attributes arrive as strings or numbers and are coerced to
/// integers. Skills are kept as the API sends them. Senior players also get
/// `salary`, `csr` and `contract_until`.
#[must_use]
pub fn reshape_player(raw: &Value, squad: Squad) -> Record {
    let mut record = Map::new();

    record.insert("id".to_string(), passthrough(raw, "id"));
    record.insert("team_id".to_string(), passthrough(raw, "teamid"));
    record.insert("first_name".to_string(), passthrough(raw, "fname"));
    record.insert("last_name".to_string(), passthrough(raw, "lname"));
    record.insert("name".to_string(), passthrough(raw, "name"));
    record.insert("age".to_string(), integer(raw, "age", None));
    record.insert("nationality".to_string(), passthrough(raw, "nationality"));

    if !squad.is_youth() {
        record.insert("salary".to_string(), integer(raw, "salary", Some(0)));
    }

    for field in COUNTED_FIELDS {
        record.insert(field.to_string(), integer(raw, field, Some(0)));
    }

    if squad.is_youth() {
        record.insert(
            "scouting_stars_used".to_string(),
            integer(raw, "scouting_stars_used", None),
        );
    } else {
        record.insert("csr".to_string(), integer(raw, "csr", Some(0)));
    }

    let skills: Map<String, Value> = SKILL_FIELDS
        .iter()
        .map(|field| ((*field).to_string(), passthrough(raw, field)))
        .collect();
    record.insert(SKILLS_FIELD.to_string(), Value::Object(skills));

    if !squad.is_youth() {
        let contract_until = raw
            .get("contract")
            .and_then(Value::as_str)
            .and_then(|c| c.split('T').next())
            .unwrap_or_default();
        record.insert(
            "contract_until".to_string(),
            Value::String(contract_until.to_string()),
        );
    }

    record
}

fn passthrough(raw: &Value, field: &str) -> Value {
    raw.get(field).cloned().unwrap_or(Value::Null)
}

/// Coerces `raw[field]` to an integer.
///
/// Missing or null values take `default` (null when `None`); values that do
/// not parse become null.
fn integer(raw: &Value, field: &str, default: Option<i64>) -> Value {
    let fallback = || default.map_or(Value::Null, Value::from);

    match raw.get(field) {
        None | Some(Value::Null) => fallback(),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| truncate(n.as_f64()))
            .map_or(Value::Null, Value::from),
        Some(Value::String(s)) if s.trim().is_empty() => fallback(),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_or_else(
            |_| {
                warn!("Player field '{field}' is not an integer: {s:?}");
                Value::Null
            },
            Value::from,
        ),
        Some(other) => {
            warn!("Player field '{field}' has unexpected type: {other}");
            Value::Null
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: Option<f64>) -> Option<i64> {
    value.filter(|v| v.is_finite()).map(|v| v.trunc() as i64)
}
