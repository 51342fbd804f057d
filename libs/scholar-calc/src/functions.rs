//! Scientific function library
//!
//! Pure unary functions over the current display value. Trigonometric
//! functions read the angle unit from the [`Settings`] passed in; nothing
//! here consults ambient state.

use serde::{Deserialize, Serialize};
use std::f64::consts;
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, ErrorKind};
use crate::settings::Settings;

/// Largest factorial argument whose result is finite in `f64`
pub const MAX_FACTORIAL_INPUT: f64 = 170.0;

/// Unary scientific function (or nullary constant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScientificFn {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Sqrt,
    Square,
    Cube,
    Reciprocal,
    Abs,
    Factorial,
    Pi,
    E,
}

impl ScientificFn {
    pub const ALL: [ScientificFn; 13] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Log,
        Self::Ln,
        Self::Sqrt,
        Self::Square,
        Self::Cube,
        Self::Reciprocal,
        Self::Abs,
        Self::Factorial,
        Self::Pi,
        Self::E,
    ];

    /// Key label
    pub fn label(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Sqrt => "√",
            Self::Square => "x²",
            Self::Cube => "x³",
            Self::Reciprocal => "1/x",
            Self::Abs => "|x|",
            Self::Factorial => "x!",
            Self::Pi => "π",
            Self::E => "e",
        }
    }

    /// Constants ignore their input
    pub fn is_constant(self) -> bool {
        matches!(self, Self::Pi | Self::E)
    }

    pub fn apply(self, x: f64, settings: &Settings) -> Result<f64, ErrorKind> {
        apply(self, x, settings)
    }
}

impl fmt::Display for ScientificFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScientificFn {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(func) = Self::ALL.into_iter().find(|f| f.label() == trimmed) {
            return Ok(func);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "sqrt" => Ok(Self::Sqrt),
            "sq" | "sqr" | "square" | "x^2" => Ok(Self::Square),
            "cube" | "x^3" => Ok(Self::Cube),
            "inv" | "recip" | "reciprocal" => Ok(Self::Reciprocal),
            "abs" => Ok(Self::Abs),
            "fact" | "factorial" | "!" => Ok(Self::Factorial),
            "pi" => Ok(Self::Pi),
            other => Err(CalcError::invalid_input(format!(
                "unknown function '{}'",
                other
            ))),
        }
    }
}

/// Apply `func` to `x`
///
/// Domain violations yield [`ErrorKind::MathDomainError`]; a zero reciprocal
/// yields [`ErrorKind::DivisionByZero`]. Any other non-finite output is
/// reported as a domain error.
pub fn apply(func: ScientificFn, x: f64, settings: &Settings) -> Result<f64, ErrorKind> {
    let result = match func {
        ScientificFn::Sin => settings.angle_unit.to_radians(x).sin(),
        ScientificFn::Cos => settings.angle_unit.to_radians(x).cos(),
        ScientificFn::Tan => settings.angle_unit.to_radians(x).tan(),
        ScientificFn::Log => {
            if x <= 0.0 {
                return Err(ErrorKind::MathDomainError);
            }
            x.log10()
        },
        ScientificFn::Ln => {
            if x <= 0.0 {
                return Err(ErrorKind::MathDomainError);
            }
            x.ln()
        },
        ScientificFn::Sqrt => {
            if x < 0.0 {
                return Err(ErrorKind::MathDomainError);
            }
            x.sqrt()
        },
        ScientificFn::Square => x * x,
        ScientificFn::Cube => x * x * x,
        ScientificFn::Reciprocal => {
            if x == 0.0 {
                return Err(ErrorKind::DivisionByZero);
            }
            1.0 / x
        },
        ScientificFn::Abs => x.abs(),
        ScientificFn::Factorial => factorial(x)?,
        ScientificFn::Pi => consts::PI,
        ScientificFn::E => consts::E,
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ErrorKind::MathDomainError)
    }
}

/// Iterative factorial for non-negative integers up to [`MAX_FACTORIAL_INPUT`]
pub fn factorial(x: f64) -> Result<f64, ErrorKind> {
    if !x.is_finite() || x < 0.0 || x.fract() != 0.0 {
        return Err(ErrorKind::MathDomainError);
    }
    // Past the cap the result is not finite; the cap also bounds the loop
    if x > MAX_FACTORIAL_INPUT {
        return Err(ErrorKind::MathDomainError);
    }

    let n = x as u32;
    let mut result = 1.0_f64;
    for i in 2..=n {
        result *= f64::from(i);
    }
    Ok(result)
}
