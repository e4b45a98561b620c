//! Python-style numeric semantics shared by both `/calculate` evaluators.
//!
//! `/` always produces a float, `//` and `%` floor toward negative infinity,
//! and `**` keeps integers when the exponent is a non-negative integer.

use crate::error::PitfallError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

impl From<NumericError> for PitfallError {
    fn from(e: NumericError) -> Self {
        PitfallError::Evaluation(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn neg(self) -> Result<Number, NumericError> {
        match self {
            Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(NumericError::Overflow),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    pub fn apply(self, op: BinaryOp, rhs: Number) -> Result<Number, NumericError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int_op(op, a, b),
            (lhs, rhs) => float_op(op, lhs.as_f64(), rhs.as_f64()).map(Number::Float),
        }
    }
}

fn int_op(op: BinaryOp, a: i64, b: i64) -> Result<Number, NumericError> {
    let out = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::TrueDiv => return float_op(op, a as f64, b as f64).map(Number::Float),
        BinaryOp::FloorDiv | BinaryOp::Mod if b == 0 => return Err(NumericError::DivisionByZero),
        BinaryOp::FloorDiv => a.checked_div(b).map(|q| {
            if a % b != 0 && ((a < 0) != (b < 0)) {
                q - 1
            } else {
                q
            }
        }),
        BinaryOp::Mod => a.checked_rem(b).map(|r| {
            if r != 0 && ((r < 0) != (b < 0)) {
                r + b
            } else {
                r
            }
        }),
        BinaryOp::Pow if b < 0 => {
            return float_op(op, a as f64, b as f64).map(Number::Float);
        }
        BinaryOp::Pow => u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp)),
    };
    out.map(Number::Int).ok_or(NumericError::Overflow)
}

fn float_op(op: BinaryOp, a: f64, b: f64) -> Result<f64, NumericError> {
    Ok(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::TrueDiv | BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => {
            return Err(NumericError::DivisionByZero);
        }
        BinaryOp::TrueDiv => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Mod => {
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
        BinaryOp::Pow if a == 0.0 && b < 0.0 => return Err(NumericError::DivisionByZero),
        BinaryOp::Pow => a.powf(b),
    })
}
