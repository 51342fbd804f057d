//! Interactive calculator REPL
//!
//! Every line is either a command (`help`, `set`, `history`, ...) or a
//! sequence of keys handed to the engine.

use anyhow::{bail, Context, Result};
use colored::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use scholar_calc::{AngleUnit, MemoryOp, Operator, ScientificFn};

use crate::app::App;
use crate::render;

const COMMANDS: [&str; 9] = [
    "help",
    "set",
    "settings",
    "history",
    "clear-history",
    "memory",
    "reset",
    "quit",
    "exit",
];

/// Tab completion for commands and key names
struct KeyHelper;

impl Helper for KeyHelper {}

impl Hinter for KeyHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for KeyHelper {}

impl Validator for KeyHelper {}

impl Completer for KeyHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let word = &line[start..];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let mut candidates: Vec<&str> = Vec::new();
        if start == 0 {
            candidates.extend(COMMANDS);
        }
        candidates.extend(ScientificFn::ALL.iter().map(|f| f.label()));
        candidates.extend(["sqrt", "pi", "mod", "MS", "MR", "MC", "M+", "M-"]);

        let matches = candidates
            .into_iter()
            .filter(|c| c.starts_with(word))
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c.to_string(),
            })
            .collect();
        Ok((start, matches))
    }
}

pub fn run(app: &mut App) -> Result<()> {
    let config = rustyline::Config::builder()
        .completion_type(rustyline::CompletionType::List)
        .build();
    let mut rl = Editor::with_config(config).context("Failed to initialize readline")?;
    rl.set_helper(Some(KeyHelper));

    println!("{}", "Scholar Calculator".bright_cyan().bold());
    println!(
        "Type '{}' for commands, {} for completion\n",
        "help".bright_yellow(),
        "Tab".bright_cyan()
    );
    render::print_view(&app.view(), &app.settings);

    loop {
        match rl.readline("scholar> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match execute(app, line) {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => eprintln!("{} {:#}", "Error:".red(), e),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            },
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "Readline error:".red(), e);
                break;
            },
        }
    }

    app.save();
    println!("Bye!");
    Ok(())
}

/// Run one REPL line; `Ok(false)` ends the session
fn execute(app: &mut App, line: &str) -> Result<bool> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.first().map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("quit") | Some("exit") => return Ok(false),
        Some("help") => print_help(),
        Some("settings") => render::print_settings(&app.settings),
        Some("set") => {
            apply_setting(app, &parts[1..])?;
            app.changed();
            render::print_view(&app.view(), &app.settings);
        },
        Some("history") => render::print_history(&app.calc.history().to_vec()),
        Some("clear-history") => {
            app.calc.clear_history();
            app.changed();
            println!("{}", "History cleared".green());
        },
        Some("memory") => render::print_memory(app.calc.memory(), &app.settings),
        Some("reset") => {
            app.calc.reset_all();
            app.changed();
            render::print_view(&app.view(), &app.settings);
        },
        _ => {
            let view = app.keys(line)?;
            render::print_view(&view, &app.settings);
        },
    }
    Ok(true)
}

fn apply_setting(app: &mut App, args: &[&str]) -> Result<()> {
    let (name, value) = match args {
        [name, value] => (*name, *value),
        _ => bail!("Usage: set <angle|precision|sci> <value>"),
    };

    let settings = app.settings;
    app.settings = match name {
        "angle" => {
            let unit = if value == "toggle" {
                settings.angle_unit.toggled()
            } else {
                value.parse::<AngleUnit>()?
            };
            settings.with_angle_unit(unit)
        },
        "precision" => {
            let precision = value
                .parse::<usize>()
                .with_context(|| format!("Invalid precision '{}'", value))?;
            settings.with_precision(precision)
        },
        "sci" => settings.with_scientific_notation(parse_switch(value)?),
        other => bail!("Unknown setting '{}'", other),
    };
    Ok(())
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        other => bail!("Expected on or off, got '{}'", other),
    }
}

fn print_help() {
    println!("{}", "Keys".bright_yellow());
    println!("  digits and numbers   7  12.5  .5");
    let operators: Vec<&str> = Operator::ALL.iter().map(|op| op.symbol()).collect();
    println!("  operators            {}  (also * / x **)", operators.join(" "));
    println!("  equals / clear       =  C");
    println!("  sign / percent       +/-  %");
    let (constants, functions): (Vec<ScientificFn>, Vec<ScientificFn>) =
        ScientificFn::ALL.into_iter().partition(|f| f.is_constant());
    let labels = |fns: &[ScientificFn]| {
        fns.iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("  functions            {}", labels(&functions));
    println!("  constants            {}", labels(&constants));
    let memory: Vec<&str> = [
        MemoryOp::Store,
        MemoryOp::Recall,
        MemoryOp::ClearMemory,
        MemoryOp::Add,
        MemoryOp::Subtract,
    ]
    .iter()
    .map(|op| op.label())
    .collect();
    println!("  memory               {}", memory.join(" "));
    println!();
    println!("{}", "Commands".bright_yellow());
    println!("  set angle deg|rad|toggle   set precision <0-20>   set sci on|off");
    println!("  settings  history  clear-history  memory  reset  quit");
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;
    use scholar_calc::Settings;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        App::open(
            JsonFileStore::new(dir.path().join("state.json")),
            Settings::default(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_set_commands() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        assert!(execute(&mut app, "set angle rad").unwrap());
        assert_eq!(app.settings.angle_unit, AngleUnit::Radians);
        execute(&mut app, "set angle toggle").unwrap();
        assert_eq!(app.settings.angle_unit, AngleUnit::Degrees);

        execute(&mut app, "set precision 50").unwrap();
        assert_eq!(app.settings.precision, 20);
        execute(&mut app, "set sci on").unwrap();
        assert!(app.settings.use_scientific_notation);

        assert!(execute(&mut app, "set precision many").is_err());
        assert!(execute(&mut app, "set colour red").is_err());
        assert!(execute(&mut app, "set sci").is_err());
    }

    #[test]
    fn test_keys_and_maintenance() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        execute(&mut app, "3 x 4 = MS").unwrap();
        assert_eq!(app.calc.history().len(), 1);
        execute(&mut app, "clear-history").unwrap();
        assert!(app.calc.history().is_empty());
        assert_eq!(app.calc.memory().value(), 12.0);

        execute(&mut app, "RESET").unwrap();
        assert_eq!(app.calc.memory().value(), 0.0);
        assert!(!execute(&mut app, "quit").unwrap());
    }
}
