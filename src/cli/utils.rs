use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::grid::{Notification, NotificationLevel};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a JSON value as-is, or as `key: value` lines for text
pub fn output_value(output_format: &OutputFormat, value: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => match value.as_object() {
            Some(fields) => {
                for (key, field) in fields {
                    match field {
                        Value::String(s) => println!("{}: {}", key, s),
                        Value::Null => println!("{}: -", key),
                        other => println!("{}: {}", key, other),
                    }
                }
            }
            None => println!("{}", value),
        },
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print queued notifications in text mode. Errors are skipped: the failing
/// command returns them as its own error.
pub fn output_notifications(output_format: &OutputFormat, notifications: Vec<Notification>) {
    if let OutputFormat::Text = output_format {
        for (to_stderr, line) in notification_lines(notifications) {
            if to_stderr {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }
}

// Errors are left out: the failing command reports them as its own error
fn notification_lines(notifications: Vec<Notification>) -> Vec<(bool, String)> {
    notifications
        .into_iter()
        .filter_map(|n| match n.level {
            NotificationLevel::Error => None,
            NotificationLevel::Warning => Some((true, format!("! {}", n.message))),
            _ => Some((false, format!("✓ {}", n.message))),
        })
        .collect()
}

/// Left-aligned plain text table sized to its widest cells
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers)];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.extend(rows.iter().map(|row| line(row)));
    out.join("\n")
}
