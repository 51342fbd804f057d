//! Calculator - immediate-evaluation state machine
//!
//! Processes one [`InputEvent`] at a time against the owned session, memory
//! bank and history log, and returns a [`Snapshot`] for rendering.
//!
//! - Operators are applied in the order entered (no precedence)
//! - Any input while in the error state first clears the session
//! - Memory and history survive `Clear`; only [`Calculator::reset_all`] wipes them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{CalcError, ErrorKind};
use crate::evaluator::{self, Operator};
use crate::format::{format_display, format_number, parse_display, raw_number};
use crate::functions::{self, ScientificFn};
use crate::history::{HistoryEntry, HistoryLog};
use crate::memory::{MemoryBank, MemoryOp};
use crate::persistence::PersistencePort;
use crate::session::{PendingOperation, Session};
use crate::settings::{Settings, SettingsPort};
use crate::snapshot::{EngineSnapshot, Snapshot, SNAPSHOT_VERSION};

/// A decimal digit `0..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = CalcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| CalcError::invalid_input(format!("{} is not a digit", value)))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

/// Input event forwarded by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputEvent {
    Digit(Digit),
    DecimalPoint,
    Operator(Operator),
    Equals,
    Clear,
    SignToggle,
    Percent,
    Scientific(ScientificFn),
    Memory(MemoryOp),
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d.as_char()),
            Self::DecimalPoint => f.write_str("."),
            Self::Operator(op) => write!(f, "{}", op),
            Self::Equals => f.write_str("="),
            Self::Clear => f.write_str("C"),
            Self::SignToggle => f.write_str("±"),
            Self::Percent => f.write_str("%"),
            Self::Scientific(func) => write!(f, "{}", func),
            Self::Memory(op) => write!(f, "{}", op),
        }
    }
}

impl FromStr for InputEvent {
    type Err = CalcError;

    /// Parse a single key token such as `7`, `.`, `×`, `=`, `sqrt` or `M+`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(digit) = Digit::from_char(c) {
                return Ok(Self::Digit(digit));
            }
        }

        match token.to_ascii_lowercase().as_str() {
            "." | "," => return Ok(Self::DecimalPoint),
            "=" | "enter" => return Ok(Self::Equals),
            "c" | "clear" | "esc" | "escape" => return Ok(Self::Clear),
            "±" | "+/-" | "neg" => return Ok(Self::SignToggle),
            "%" => return Ok(Self::Percent),
            _ => {},
        }

        if let Ok(op) = token.parse::<MemoryOp>() {
            return Ok(Self::Memory(op));
        }
        if let Ok(op) = token.parse::<Operator>() {
            return Ok(Self::Operator(op));
        }
        if let Ok(func) = token.parse::<ScientificFn>() {
            return Ok(Self::Scientific(func));
        }

        Err(CalcError::invalid_input(format!("unknown key '{}'", token)))
    }
}

/// Scientific calculator engine
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    session: Session,
    memory: MemoryBank,
    history: HistoryLog,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an engine from a persisted snapshot
    ///
    /// Inconsistent snapshots are repaired rather than rejected: excess
    /// history is dropped, an error message on the display is re-rendered as
    /// that error and any other unreadable display is reset to "0".
    pub fn restore(snapshot: EngineSnapshot) -> Self {
        let EngineSnapshot {
            version,
            mut session,
            mut memory,
            mut history,
        } = snapshot;

        if version > SNAPSHOT_VERSION {
            warn!(
                version,
                supported = SNAPSHOT_VERSION,
                "Snapshot written by a newer version, loading what is understood"
            );
        }

        let dropped = history.enforce_capacity();
        if dropped > 0 {
            warn!(dropped, "Restored history exceeded capacity");
        }

        let dropped = memory.enforce_log_capacity();
        if dropped > 0 {
            warn!(dropped, "Restored memory log exceeded capacity");
        }

        // An error message left on the display without its tag counts as that error
        let error = session
            .error
            .or_else(|| ErrorKind::from_message(&session.display_value));
        match error {
            Some(ErrorKind::InputTooLong) => {
                warn!("Restored session carried a non-state error, resetting");
                session.reset();
            },
            Some(kind) => session.fail(kind),
            None => {
                if parse_display(&session.display_value).is_none() {
                    warn!(
                        display = %session.display_value,
                        "Restored display is not a number, resetting"
                    );
                    session.reset();
                }
            },
        }

        debug!(
            display = %session.display_value,
            history = history.len(),
            memory = memory.value(),
            "Calculator restored"
        );

        Self {
            session,
            memory,
            history,
        }
    }

    /// Load from `port`, falling back to a fresh engine on any failure
    pub fn resume<P: PersistencePort + ?Sized>(port: &P) -> Self {
        match port.load() {
            Ok(Some(snapshot)) => Self::restore(snapshot),
            Ok(None) => Self::new(),
            Err(e) => {
                warn!("Failed to load calculator snapshot, starting fresh: {}", e);
                Self::new()
            },
        }
    }

    /// Complete state for the persistence port
    pub fn export(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: SNAPSHOT_VERSION,
            session: self.session.clone(),
            memory: self.memory.clone(),
            history: self.history.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Process one event and return the resulting view
    pub fn handle<S: SettingsPort + ?Sized>(&mut self, event: InputEvent, settings: &S) -> Snapshot {
        let settings = settings.snapshot();
        self.apply(event, &settings);
        self.render(&settings)
    }

    /// Process events in order, returning the view after the last one
    pub fn handle_all<S, I>(&mut self, events: I, settings: &S) -> Snapshot
    where
        S: SettingsPort + ?Sized,
        I: IntoIterator<Item = InputEvent>,
    {
        let settings = settings.snapshot();
        for event in events {
            self.apply(event, &settings);
        }
        self.render(&settings)
    }

    /// Current view without processing anything
    pub fn snapshot<S: SettingsPort + ?Sized>(&self, settings: &S) -> Snapshot {
        self.render(&settings.snapshot())
    }

    /// Empty the history log
    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("History cleared");
    }

    /// Reset session, memory and history
    pub fn reset_all(&mut self) {
        self.session.reset();
        self.memory.clear();
        self.history.clear();
        info!("Calculator reset");
    }

    fn apply(&mut self, event: InputEvent, settings: &Settings) {
        if self.session.error.is_some() {
            self.session.reset();
        }

        match event {
            InputEvent::Digit(digit) => self.digit(digit),
            InputEvent::DecimalPoint => self.decimal_point(),
            InputEvent::Operator(op) => self.operator(op, settings),
            InputEvent::Equals => self.equals(settings),
            InputEvent::Clear => self.session.reset(),
            InputEvent::SignToggle => self.sign_toggle(),
            InputEvent::Percent => self.percent(),
            InputEvent::Scientific(func) => self.scientific(func, settings),
            InputEvent::Memory(op) => self.memory_op(op),
        }

        debug!(
            %event,
            state = ?self.session.state(),
            display = %self.session.display_value,
            awaiting = self.session.awaiting_new_operand,
            "Event processed"
        );
    }

    fn digit(&mut self, digit: Digit) {
        let session = &mut self.session;
        if session.awaiting_new_operand {
            session.display_value = digit.as_char().to_string();
            session.awaiting_new_operand = false;
            return;
        }
        if session.is_at_input_cap() {
            debug!(reason = %ErrorKind::InputTooLong, "Digit rejected");
            return;
        }
        if session.display_value == "0" {
            session.display_value.clear();
        }
        session.display_value.push(digit.as_char());
    }

    fn decimal_point(&mut self) {
        let session = &mut self.session;
        if session.awaiting_new_operand {
            session.display_value = "0.".to_string();
            session.awaiting_new_operand = false;
            return;
        }
        if session.display_value.contains('.') {
            debug!("Decimal point ignored, display already has one");
            return;
        }
        if session.is_at_input_cap() {
            debug!(reason = %ErrorKind::InputTooLong, "Decimal point rejected");
            return;
        }
        session.display_value.push('.');
    }

    fn operator(&mut self, op: Operator, settings: &Settings) {
        let input = self.session.display_number();

        let current = self.session.pending;
        let next = match current {
            None => PendingOperation {
                operand: input,
                operator: op,
            },
            Some(pending) if !self.session.awaiting_new_operand => {
                match evaluator::evaluate(pending.operand, input, pending.operator) {
                    Ok(result) => {
                        self.record(pending, input, result, settings);
                        self.session.display_value = raw_number(result);
                        PendingOperation {
                            operand: result,
                            operator: op,
                        }
                    },
                    Err(kind) => return self.fail(kind),
                }
            },
            // Operator pressed twice in a row: the new one replaces the old
            Some(pending) => PendingOperation {
                operand: pending.operand,
                operator: op,
            },
        };

        self.session.pending = Some(next);
        self.session.awaiting_new_operand = true;
    }

    fn equals(&mut self, settings: &Settings) {
        let Some(pending) = self.session.pending else {
            debug!("Equals with nothing pending");
            return;
        };

        let input = self.session.display_number();
        match evaluator::evaluate(pending.operand, input, pending.operator) {
            Ok(result) => {
                self.record(pending, input, result, settings);
                self.session.display_value = raw_number(result);
                self.session.pending = None;
                self.session.awaiting_new_operand = true;
            },
            Err(kind) => self.fail(kind),
        }
    }

    fn sign_toggle(&mut self) {
        let value = self.session.display_number();
        self.session.display_value = raw_number(-value);
    }

    fn percent(&mut self) {
        let value = self.session.display_number();
        self.session.display_value = raw_number(value / 100.0);
    }

    fn scientific(&mut self, func: ScientificFn, settings: &Settings) {
        let value = self.session.display_number();
        match functions::apply(func, value, settings) {
            Ok(result) => {
                self.session.display_value = raw_number(result);
                self.session.awaiting_new_operand = true;
            },
            Err(kind) => self.fail(kind),
        }
    }

    fn memory_op(&mut self, op: MemoryOp) {
        let value = self.session.display_number();
        match op {
            MemoryOp::Store => self.memory.store(value),
            MemoryOp::Recall => {
                self.session.display_value = raw_number(self.memory.recall());
                self.session.awaiting_new_operand = true;
            },
            MemoryOp::ClearMemory => self.memory.clear(),
            MemoryOp::Add => {
                if let Err(kind) = self.memory.add(value) {
                    self.fail(kind);
                }
            },
            MemoryOp::Subtract => {
                if let Err(kind) = self.memory.subtract(value) {
                    self.fail(kind);
                }
            },
        }
    }

    fn record(&mut self, pending: PendingOperation, input: f64, result: f64, settings: &Settings) {
        let expression = format!(
            "{} {} {}",
            format_number(pending.operand, settings),
            pending.operator.symbol(),
            format_number(input, settings)
        );
        self.history
            .append(HistoryEntry::new(expression, format_number(result, settings)));
    }

    fn fail(&mut self, kind: ErrorKind) {
        warn!(error = %kind, display = %self.session.display_value, "Calculation failed");
        self.session.fail(kind);
    }

    fn render(&self, settings: &Settings) -> Snapshot {
        let session = &self.session;
        Snapshot {
            display_text: format_display(&session.display_value, session.error, settings),
            pending_operator_text: session.pending_operator().map(|op| op.symbol().to_string()),
            pending_operand_text: session
                .pending_operand()
                .map(|operand| format_number(operand, settings)),
            error_kind: session.error,
            memory_indicator_active: self.memory.is_active(),
            memory_text: self
                .memory
                .is_active()
                .then(|| format_number(self.memory.value(), settings)),
            history: self.history.to_vec(),
        }
    }
}
