//! Scholar - scientific calculator on the command line
//!
//! Drives the scholar-calc engine either one-shot (`scholar eval 2 + 3 =`)
//! or interactively (`scholar`, `scholar repl`). Calculator state, including
//! memory and history, is kept in a JSON state file between runs.

mod app;
mod config;
mod logging;
mod render;
mod repl;
mod store;
mod tokens;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use scholar_calc::{format_number, parse_display, AngleUnit, Settings};
use std::path::PathBuf;

use crate::app::App;
use crate::config::CliConfig;
use crate::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Scholar - immediate-evaluation scientific calculator")]
#[command(long_about = "Scholar - immediate-evaluation scientific calculator

Operators are applied in the order they are entered, like a pocket
calculator: 2 + 3 × 4 = gives 20.

Examples:
  scholar                              # Interactive calculator
  scholar eval 2 + 3 x 4 =             # One-shot key sequence
  scholar eval 9 0 sin --angle deg     # Trig in degrees
  scholar format 1234567.891 --sci     # Format a number
  scholar history                      # Recent calculations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (default: scholar.toml or scholar.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// State file (overrides the configured one)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Do not write the state file
    #[arg(long, global = true)]
    no_save: bool,

    /// Angle unit: deg or rad
    #[arg(long, global = true)]
    angle: Option<AngleUnit>,

    /// Fractional digits shown (0-20)
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Use scientific notation
    #[arg(long, global = true, conflicts_with = "fixed")]
    sci: bool,

    /// Use fixed notation
    #[arg(long, global = true)]
    fixed: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive calculator (default)
    Repl,

    /// Press a sequence of keys and print the result
    Eval {
        /// Keys, e.g. `12.5 x 2 =` or `9 sqrt`
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },

    /// Format a number with the current display settings
    Format {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show recent calculations
    History {
        /// Empty the history instead
        #[arg(long)]
        clear: bool,
    },

    /// Show the memory register and its log
    Memory,

    /// Reset display, memory and history
    Reset,
}

impl Cli {
    fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(angle) = self.angle {
            settings = settings.with_angle_unit(angle);
        }
        if let Some(precision) = self.precision {
            settings = settings.with_precision(precision);
        }
        if self.sci {
            settings = settings.with_scientific_notation(true);
        } else if self.fixed {
            settings = settings.with_scientific_notation(false);
        }
        settings
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config: CliConfig = config::load(cli.config.as_deref())?;
    logging::init(if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    })?;

    let state_file = cli
        .state
        .clone()
        .unwrap_or_else(|| config.state_file.clone());
    let auto_save = config.auto_save && !cli.no_save;

    let mut app = App::open(JsonFileStore::new(state_file), config.settings, auto_save)
        .context("Failed to open calculator state")?;
    app.settings = cli.apply_overrides(app.settings);

    match cli.command.as_ref().unwrap_or(&Commands::Repl) {
        Commands::Repl => repl::run(&mut app)?,
        Commands::Eval { keys } => {
            let view = app.keys(&keys.join(" "))?;
            if cli.json {
                render::print_json(&view)?;
            } else {
                render::print_view(&view, &app.settings);
            }
        },
        Commands::Format { value } => {
            let number = parse_display(value)
                .with_context(|| format!("'{}' is not a finite number", value))?;
            let text = format_number(number, &app.settings);
            if cli.json {
                render::print_json(&serde_json::json!({ "input": value, "display_text": text }))?;
            } else {
                println!("{}", text.bright_white().bold());
            }
        },
        Commands::History { clear } => {
            if *clear {
                app.calc.clear_history();
                app.changed();
                println!("{}", "History cleared".green());
            } else if cli.json {
                render::print_json(app.calc.history())?;
            } else {
                render::print_history(&app.calc.history().to_vec());
            }
        },
        Commands::Memory => {
            if cli.json {
                render::print_json(app.calc.memory())?;
            } else {
                render::print_memory(app.calc.memory(), &app.settings);
            }
        },
        Commands::Reset => {
            app.calc.reset_all();
            app.changed();
            println!("{}", "Calculator reset".green());
        },
    }

    Ok(())
}
