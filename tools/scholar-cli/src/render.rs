//! Terminal output

use colored::*;
use scholar_calc::{HistoryEntry, MemoryBank, Settings, Snapshot};

/// Print the calculator view: status line, pending operation, display
pub fn print_view(view: &Snapshot, settings: &Settings) {
    let mut status = vec![settings.angle_unit.label().bright_cyan().to_string()];
    if settings.use_scientific_notation {
        status.push("SCI".bright_cyan().to_string());
    }
    if let Some(memory) = view.memory_text.as_deref() {
        status.push(format!("{} {}", "M".bright_magenta(), memory));
    }
    println!("{}", status.join("  "));

    if let (Some(operand), Some(operator)) = (
        view.pending_operand_text.as_deref(),
        view.pending_operator_text.as_deref(),
    ) {
        println!("{} {}", operand.dimmed(), operator.yellow());
    }

    if view.is_error() {
        println!("{}", view.display_text.red().bold());
    } else {
        println!("{}", view.display_text.bright_white().bold());
    }
}

pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No calculations yet".dimmed());
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}  {} = {}  {}",
            (i + 1).to_string().dimmed(),
            entry.expression,
            entry.result.bright_green(),
            entry
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
    }
}

pub fn print_memory(memory: &MemoryBank, settings: &Settings) {
    println!(
        "{} {}",
        "Memory:".bright_cyan(),
        scholar_calc::format_number(memory.value(), settings)
    );
    for op in memory.operations() {
        println!("  {}", op.dimmed());
    }
}

pub fn print_settings(settings: &Settings) {
    println!("{} {}", "angle    ".bright_cyan(), settings.angle_unit);
    println!("{} {}", "precision".bright_cyan(), settings.precision);
    println!(
        "{} {}",
        "sci      ".bright_cyan(),
        if settings.use_scientific_notation { "on" } else { "off" }
    );
}

/// Pretty JSON on stdout for `--json`
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
