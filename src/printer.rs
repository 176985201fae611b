//! Human-readable rendering of a resolved configuration.

use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::config::{parse_bool, Configuration};
use crate::constants::SEPARATOR_MAX_WIDTH;
use crate::i18n::Translator;
use crate::output::{format_notice, Level};

fn separator_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(SEPARATOR_MAX_WIDTH)
        .clamp(1, SEPARATOR_MAX_WIDTH)
}

fn render_value(value: &str, tr: &Translator) -> String {
    match parse_bool(value) {
        Some(true) => tr.text("config.enabled").green().to_string(),
        Some(false) => tr.text("config.disabled").red().to_string(),
        None => value.to_string(),
    }
}

/// Writes `config` section by section to `out`.
///
/// Boolean tokens are shown as Enabled/Disabled. Write errors are ignored;
/// printing is best-effort.
pub fn print_config(
    config: Option<&Configuration>,
    path: Option<&Path>,
    tr: &Translator,
    out: &mut dyn Write,
) {
    let _ = write_config(config, path, tr, separator_width(), out);
}

fn write_config(
    config: Option<&Configuration>,
    path: Option<&Path>,
    tr: &Translator,
    width: usize,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let Some(config) = config else {
        return writeln!(
            out,
            "{}",
            format_notice(Level::Warning, &tr.text("config.config_not_available"))
        );
    };

    let separator = "─".repeat(width);
    writeln!(
        out,
        "\n{} {}",
        Level::Info.emoji().cyan(),
        format!("{}:", tr.text("config.configuration")).cyan()
    )?;
    writeln!(out, "{}", separator.cyan())?;

    for section in config.sections() {
        writeln!(out, "{}", format!("[{}]", section.name()).green())?;
        for (key, value) in section.entries() {
            writeln!(out, "  {} = {}", key, render_value(value, tr))?;
        }
    }

    writeln!(out, "{}", separator.cyan())?;
    if let Some(path) = path {
        let dir = path.parent().unwrap_or(path);
        writeln!(
            out,
            "{} {}: {}",
            Level::Info.emoji().cyan(),
            tr.text("config.config_directory"),
            dir.display()
        )?;
    }
    writeln!(out)
}
