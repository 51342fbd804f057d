//! scholar-calc - Scientific calculator engine
//!
//! An immediate-evaluation calculator: operators are applied as they are
//! entered, strictly left to right, like a physical calculator rather than an
//! expression parser.
//!
//! # Features
//!
//! - **Arithmetic**: `+`, `-`, `×`, `÷`, `mod`, `^` with no precedence
//! - **Scientific functions**: trigonometry in degrees or radians, logarithms,
//!   roots, powers, reciprocal, absolute value, factorial, `π`, `e`
//! - **Memory bank**: `MS`, `MR`, `MC`, `M+`, `M-`
//! - **History**: the last 20 completed calculations, most recent first
//! - **Formatting**: precision, thousands grouping and exponential notation
//!
//! # Example
//!
//! ```rust
//! use scholar_calc::{Calculator, InputEvent, Settings};
//!
//! let settings = Settings::default();
//! let mut calc = Calculator::new();
//!
//! let keys = ["2", "+", "3", "×", "4", "="];
//! let events = keys.iter().map(|k| k.parse::<InputEvent>().unwrap());
//! let view = calc.handle_all(events, &settings);
//!
//! // (2 + 3) × 4, not 2 + (3 × 4)
//! assert_eq!(view.display_text, "20");
//! assert_eq!(view.history.len(), 2);
//! ```
//!
//! # Persistence
//!
//! The engine never saves by itself. Callers persist [`Calculator::export`]
//! through a [`PersistencePort`] and start with [`Calculator::resume`], which
//! falls back to a fresh engine when loading fails.

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod functions;
pub mod history;
pub mod memory;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod snapshot;

// Re-exports for convenience
pub use engine::{Calculator, Digit, InputEvent};
pub use error::{CalcError, ErrorKind, Result};
pub use evaluator::{evaluate, Operator};
pub use format::{format_display, format_number, parse_display};
pub use functions::ScientificFn;
pub use history::{HistoryEntry, HistoryLog, HISTORY_CAPACITY};
pub use memory::{MemoryBank, MemoryOp, MEMORY_LOG_CAPACITY};
pub use persistence::{MemoryPersistence, NullPersistence, PersistencePort};
pub use session::{Session, SessionState, INPUT_CAP};
pub use settings::{AngleUnit, Settings, SettingsPort};
pub use snapshot::{EngineSnapshot, Snapshot};
