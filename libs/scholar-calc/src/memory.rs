//! Single-register memory bank
//!
//! The register survives `clear()` and is only reset by an explicit memory
//! clear or `reset_all()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, ErrorKind};

/// Mutation log entries kept; older ones are dropped first
pub const MEMORY_LOG_CAPACITY: usize = 50;

/// Memory key operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryOp {
    Store,
    Recall,
    ClearMemory,
    Add,
    Subtract,
}

impl MemoryOp {
    pub fn label(self) -> &'static str {
        match self {
            Self::Store => "MS",
            Self::Recall => "MR",
            Self::ClearMemory => "MC",
            Self::Add => "M+",
            Self::Subtract => "M-",
        }
    }
}

impl fmt::Display for MemoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MemoryOp {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MS" => Ok(Self::Store),
            "MR" => Ok(Self::Recall),
            "MC" => Ok(Self::ClearMemory),
            "M+" => Ok(Self::Add),
            "M-" => Ok(Self::Subtract),
            other => Err(CalcError::invalid_input(format!(
                "unknown memory key '{}'",
                other
            ))),
        }
    }
}

/// Memory register plus a bounded log of mutations
///
/// The log is append-only apart from eviction of its oldest entries;
/// only `MC` (or `reset_all()`) empties it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBank {
    register: f64,
    operations: Vec<String>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.register
    }

    /// Human-readable mutation log, oldest first, at most [`MEMORY_LOG_CAPACITY`]
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// A non-zero register lights the memory indicator
    pub fn is_active(&self) -> bool {
        self.register != 0.0
    }

    pub fn store(&mut self, value: f64) {
        self.register = value;
        self.record(MemoryOp::Store, value);
    }

    pub fn recall(&self) -> f64 {
        self.register
    }

    /// `M+`; the register is left untouched if the sum is not finite
    pub fn add(&mut self, value: f64) -> Result<(), ErrorKind> {
        self.accumulate(MemoryOp::Add, self.register + value, value)
    }

    /// `M-`; the register is left untouched if the difference is not finite
    pub fn subtract(&mut self, value: f64) -> Result<(), ErrorKind> {
        self.accumulate(MemoryOp::Subtract, self.register - value, value)
    }

    /// Reset the register to zero and drop the log
    pub fn clear(&mut self) {
        self.register = 0.0;
        self.operations.clear();
    }

    fn accumulate(&mut self, op: MemoryOp, next: f64, operand: f64) -> Result<(), ErrorKind> {
        if !next.is_finite() {
            return Err(ErrorKind::Overflow);
        }
        self.register = next;
        self.record(op, operand);
        Ok(())
    }

    fn record(&mut self, op: MemoryOp, value: f64) {
        self.operations.push(format!("{}: {}", op.label(), value));
        self.enforce_log_capacity();
    }

    /// Drop the oldest log entries past the capacity
    pub(crate) fn enforce_log_capacity(&mut self) -> usize {
        let excess = self.operations.len().saturating_sub(MEMORY_LOG_CAPACITY);
        self.operations.drain(..excess);
        excess
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_register_operations() {
        let mut bank = MemoryBank::new();
        assert!(!bank.is_active());

        bank.store(42.0);
        assert_eq!(bank.recall(), 42.0);
        bank.add(8.0).unwrap();
        assert_eq!(bank.value(), 50.0);
        bank.subtract(60.0).unwrap();
        assert_eq!(bank.value(), -10.0);
        assert!(bank.is_active());

        assert_eq!(bank.operations(), ["MS: 42", "M+: 8", "M-: 60"]);
    }

    #[test]
    fn test_overflow_leaves_register_untouched() {
        let mut bank = MemoryBank::new();
        bank.store(f64::MAX);
        assert_eq!(bank.add(f64::MAX), Err(ErrorKind::Overflow));
        assert_eq!(bank.value(), f64::MAX);
        assert_eq!(bank.operations().len(), 1);
    }

    #[test]
    fn test_clear_resets_register_and_log() {
        let mut bank = MemoryBank::new();
        bank.store(3.5);
        bank.clear();
        assert_eq!(bank.value(), 0.0);
        assert!(bank.operations().is_empty());
        assert!(!bank.is_active());
    }

    #[test]
    fn test_log_is_bounded() {
        let mut bank = MemoryBank::new();
        for i in 0..MEMORY_LOG_CAPACITY + 5 {
            bank.add(i as f64).unwrap();
        }

        assert_eq!(bank.operations().len(), MEMORY_LOG_CAPACITY);
        assert_eq!(bank.operations()[0], "M+: 5");
        let last = format!("M+: {}", MEMORY_LOG_CAPACITY + 4);
        assert_eq!(bank.operations().last(), Some(&last));
    }

    #[test]
    fn test_parse_memory_op() {
        assert_eq!("m+".parse::<MemoryOp>().unwrap(), MemoryOp::Add);
        assert_eq!("MC".parse::<MemoryOp>().unwrap(), MemoryOp::ClearMemory);
        assert!("M*".parse::<MemoryOp>().is_err());
    }
}
