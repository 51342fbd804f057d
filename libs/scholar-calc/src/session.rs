//! Live calculator session
//!
//! The session is owned and mutated exclusively by
//! [`Calculator`](crate::engine::Calculator). The pending operand and pending
//! operator are stored together so one can never be set without the other.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::evaluator::Operator;
use crate::format::parse_display;

/// Maximum length of display text built from digit entry
pub const INPUT_CAP: usize = 20;

/// Left-hand side of an in-flight binary operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub operand: f64,
    pub operator: Operator,
}

/// Coarse state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Ready,
    PendingOperator,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Operand being built, or the last result (unformatted)
    pub display_value: String,
    pub pending: Option<PendingOperation>,
    /// Next digit starts a fresh number instead of appending
    pub awaiting_new_operand: bool,
    /// When set, `display_value` holds the error message
    pub error: Option<ErrorKind>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            display_value: "0".to_string(),
            pending: None,
            awaiting_new_operand: false,
            error: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.error.is_some() {
            SessionState::Error
        } else if self.pending.is_some() {
            SessionState::PendingOperator
        } else {
            SessionState::Ready
        }
    }

    pub fn pending_operand(&self) -> Option<f64> {
        self.pending.map(|p| p.operand)
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending.map(|p| p.operator)
    }

    /// Numeric value of the display; `0` when it does not parse
    pub fn display_number(&self) -> f64 {
        parse_display(&self.display_value).unwrap_or(0.0)
    }

    pub fn is_at_input_cap(&self) -> bool {
        self.display_value.chars().count() >= INPUT_CAP
    }

    /// Back to a fresh "0" display with nothing pending
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Enter the error state; pending work is discarded
    pub fn fail(&mut self, kind: ErrorKind) {
        self.display_value = kind.message().to_string();
        self.pending = None;
        self.awaiting_new_operand = false;
        self.error = Some(kind);
    }
}
