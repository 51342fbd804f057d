//! Binary arithmetic evaluator
//!
//! Evaluation is immediate: the state machine applies each operator as soon
//! as its right-hand operand is complete, strictly in entry order. There is
//! no precedence table, so `2 + 3 × 4` is `(2 + 3) × 4 = 20`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, ErrorKind};

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::Power,
    ];

    /// Symbol shown on the key and in history expressions
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "mod",
            Self::Power => "^",
        }
    }

    /// Apply the operator to `a` and `b`
    pub fn apply(self, a: f64, b: f64) -> Result<f64, ErrorKind> {
        evaluate(a, b, self)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "add" => Ok(Self::Add),
            "-" | "−" | "sub" => Ok(Self::Subtract),
            "*" | "x" | "×" | "mul" => Ok(Self::Multiply),
            "/" | "÷" | "div" => Ok(Self::Divide),
            "mod" => Ok(Self::Modulo),
            "^" | "**" | "pow" | "xʸ" => Ok(Self::Power),
            other => Err(CalcError::invalid_input(format!(
                "unknown operator '{}'",
                other
            ))),
        }
    }
}

/// Evaluate `a op b`
///
/// Division and modulo by zero yield [`ErrorKind::DivisionByZero`]; any other
/// non-finite result yields [`ErrorKind::Overflow`].
pub fn evaluate(a: f64, b: f64, op: Operator) -> Result<f64, ErrorKind> {
    let result = match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide => {
            if b == 0.0 {
                return Err(ErrorKind::DivisionByZero);
            }
            a / b
        },
        Operator::Modulo => {
            if b == 0.0 {
                return Err(ErrorKind::DivisionByZero);
            }
            a % b
        },
        Operator::Power => a.powf(b),
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ErrorKind::Overflow)
    }
}
