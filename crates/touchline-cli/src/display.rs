//! Terminal formatting for tool listings.

use colored::Colorize;
use serde_json::Value;

use touchline_common::Tool;

/// Parameter names of a tool, required ones marked with `*`.
fn parameter_summary(tool: &Tool) -> String {
    let params = &tool.function.parameters;
    let required: Vec<&str> = params["required"]
        .as_array()
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    params["properties"]
        .as_object()
        .map(|props| {
            props
                .keys()
                .map(|name| {
                    if required.contains(&name.as_str()) {
                        format!("{name}*")
                    } else {
                        name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

pub fn print_tool(tool: &Tool) {
    println!(
        "{} ({})",
        tool.function.name.cyan().bold(),
        parameter_summary(tool)
    );
    println!("  {}", tool.function.description.dimmed());
}
