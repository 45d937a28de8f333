//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - Replay reports (engine calls and harness lines)
//! - JSON syntax highlighting

use colored::Colorize;
use serde_json::Value;

use crate::animation::EngineCall;
use crate::compositor::WindowId;
use crate::trace::ReplayReport;

/// Indentation used for pretty-printed JSON.
const INDENT: &str = "  ";

// ============================================================================
// JSON
// ============================================================================

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
pub fn print_highlighted_json(value: &Value) { println!("{}", highlight_json(value)); }

/// Renders `value` as pretty-printed, highlighted JSON.
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_json(&mut out, value, 0);
    out
}

fn write_json(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(b) => out.push_str(&b.to_string().magenta().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(s) => out.push_str(&quote(s).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, depth + 1);
                write_json(out, item, depth + 1);
                push_separator(out, i + 1 == items.len());
            }
            push_indent(out, depth);
            out.push(']');
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(out, depth + 1);
                out.push_str(&quote(key).cyan().to_string());
                out.push_str(": ");
                write_json(out, item, depth + 1);
                push_separator(out, i + 1 == map.len());
            }
            push_indent(out, depth);
            out.push('}');
        }
    }
}

fn quote(s: &str) -> String { Value::String(s.to_string()).to_string() }

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_separator(out: &mut String, last: bool) {
    if !last {
        out.push(',');
    }
    out.push('\n');
}

// ============================================================================
// Replay Reports
// ============================================================================

/// Formats one engine call as a single line.
#[must_use]
pub fn format_engine_call(call: &EngineCall) -> String {
    match call {
        EngineCall::ApplyPersistent {
            window,
            handle,
            duration,
            animations,
        }
        | EngineCall::ApplyTransient {
            window,
            handle,
            duration,
            animations,
        } => {
            let kind = if call.is_persistent() { "persistent" } else { "transient" };
            let animations: Vec<String> = animations.iter().map(ToString::to_string).collect();
            format!(
                "{} {kind:<10} window {window} {handle} {} ms  {}",
                "apply".blue().bold(),
                duration.as_millis().to_string().yellow(),
                animations.join(", ")
            )
        }
        EngineCall::Cancel { handle, window, live } => {
            let target = window.map_or_else(|| "-".to_string(), |id| id.to_string());
            let state = if *live { String::new() } else { " (inert)".dimmed().to_string() };
            format!("{} {:<10} window {target} {handle}{state}", "cancel".red().bold(), "")
        }
    }
}

/// Formats a list of window IDs, or `none`.
#[must_use]
pub fn format_windows(windows: &[WindowId]) -> String {
    if windows.is_empty() {
        return "none".dimmed().to_string();
    }
    windows.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Prints a replay report in human-readable form.
pub fn print_report(report: &ReplayReport, harness: bool) {
    if !report.effect_enabled {
        println!("{}\n", "frozen-app effect is disabled in the configuration".yellow());
    }

    println!("{} ({})", "Engine calls".bold(), report.engine_calls.len());
    for (i, call) in report.engine_calls.iter().enumerate() {
        println!("  {:>3}  {}", i + 1, format_engine_call(call));
    }

    if harness {
        println!("\n{} ({})", "Harness".bold(), report.harness_lines.len());
        for line in &report.harness_lines {
            println!("  {line}");
        }
    }

    println!("\n{} {}", "Frozen at end:".bold(), format_windows(&report.applied_windows));
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
