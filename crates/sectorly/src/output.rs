//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use sectorly_core::AlarmState;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Alarm state label, colored when enabled. `None` means the panel is offline.
pub fn alarm_label(state: Option<AlarmState>, color: bool) -> String {
    let label = state.map_or_else(|| "offline".to_owned(), |s| s.to_string());
    if !color {
        return label;
    }
    match state {
        Some(AlarmState::Disarmed) => label.green().to_string(),
        Some(AlarmState::ArmedHome | AlarmState::ArmedAway) => label.red().bold().to_string(),
        Some(AlarmState::Unknown) => label.yellow().to_string(),
        None => label.dimmed().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable items in the chosen format.
///
/// `to_row` builds the table row, `id_fn` the identifier printed by `plain`.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item. Table output uses `detail_fn` instead of a `Tabled` row.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
    }

    #[test]
    fn plain_prints_one_id_per_line() {
        let data = vec![json!({"id": "a"}), json!({"id": "b"})];
        let out = render_list(
            &OutputFormat::Plain,
            &data,
            |v| Row {
                id: v["id"].to_string(),
            },
            |v| v["id"].as_str().unwrap_or_default().to_owned(),
        );
        assert_eq!(out.ok().as_deref(), Some("a\nb"));
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_single(&OutputFormat::JsonCompact, &json!({"a": 1}), |_| String::new(), |_| String::new());
        assert_eq!(out.ok().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn alarm_label_without_color() {
        assert_eq!(alarm_label(Some(AlarmState::ArmedAway), false), "armed_away");
        assert_eq!(alarm_label(None, false), "offline");
    }
}
