//! The operation set: ten pure two-operand arithmetic behaviors over
//! arbitrary-precision decimals.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Failure modes of the dispatch core.
///
/// Both variants are deterministic functions of the input: nothing here is
/// transient or retryable, and callers surface the message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The requested name matches no registered operation.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The operands violate the operation's domain precondition. The reason
    /// names the specific precondition, never a generic "invalid input".
    #[error("{0}")]
    InvalidOperands(&'static str),
}

const DIVISION_BY_ZERO: &str = "Division by zero";
const NEGATIVE_EXPONENT: &str = "Negative exponents not supported";
const NEGATIVE_ROOT_BASE: &str = "Cannot calculate root of negative number";
const ZERO_ROOT: &str = "Zero root is undefined";
const UNREPRESENTABLE: &str = "Result is not representable as a decimal";

/// A named, pure, two-operand-to-one-result arithmetic function.
///
/// A closed enum rather than a trait hierarchy: the behaviors share nothing
/// but the two-operands-in, one-result-out contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntegerDivision,
    Percentage,
    AbsoluteDifference,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
        Operation::Root,
        Operation::Modulus,
        Operation::IntegerDivision,
        Operation::Percentage,
        Operation::AbsoluteDifference,
    ];

    /// Canonical uppercase name the operation is registered under.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Subtract => "SUBTRACT",
            Operation::Multiply => "MULTIPLY",
            Operation::Divide => "DIVIDE",
            Operation::Power => "POWER",
            Operation::Root => "ROOT",
            Operation::Modulus => "MODULUS",
            Operation::IntegerDivision => "INTEGERDIVISION",
            Operation::Percentage => "PERCENTAGE",
            Operation::AbsoluteDifference => "ABSOLUTEDIFFERENCE",
        }
    }

    /// Apply the operation to `(a, b)`.
    ///
    /// # Errors
    /// [`EvalError::InvalidOperands`] when the operands violate this
    /// operation's domain precondition.
    pub fn apply(self, a: Decimal, b: Decimal) -> Result<Decimal, EvalError> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide => {
                if b.is_zero() {
                    return Err(EvalError::InvalidOperands(DIVISION_BY_ZERO));
                }
                Ok(a / b)
            }
            Operation::Power => {
                if b.is_sign_negative() && !b.is_zero() {
                    return Err(EvalError::InvalidOperands(NEGATIVE_EXPONENT));
                }
                pow_via_f64(a, b)
            }
            Operation::Root => {
                if a.is_sign_negative() && !a.is_zero() {
                    return Err(EvalError::InvalidOperands(NEGATIVE_ROOT_BASE));
                }
                if b.is_zero() {
                    return Err(EvalError::InvalidOperands(ZERO_ROOT));
                }
                let degree = b
                    .to_f64()
                    .ok_or(EvalError::InvalidOperands(UNREPRESENTABLE))?;
                pow_via_f64_exponent(a, 1.0 / degree)
            }
            Operation::Modulus => {
                if b.is_zero() {
                    return Err(EvalError::InvalidOperands(DIVISION_BY_ZERO));
                }
                Ok(a % b)
            }
            Operation::IntegerDivision => {
                if b.is_zero() {
                    return Err(EvalError::InvalidOperands(DIVISION_BY_ZERO));
                }
                Ok((a / b).floor())
            }
            Operation::Percentage => {
                if b.is_zero() {
                    return Err(EvalError::InvalidOperands(DIVISION_BY_ZERO));
                }
                Ok((a / b) * Decimal::ONE_HUNDRED)
            }
            Operation::AbsoluteDifference => {
                // Sign-correct difference first, then negate if negative, so
                // operands with differing scale behave identically.
                let diff = a - b;
                Ok(if diff.is_sign_negative() { -diff } else { diff })
            }
        }
    }
}

/// Exponentiation round-trips through binary floating point: exact decimal
/// exponentiation has no agreed definition for fractional exponents. This is
/// a known-lossy path, accepted for POWER and ROOT only.
fn pow_via_f64(base: Decimal, exponent: Decimal) -> Result<Decimal, EvalError> {
    let exp = exponent
        .to_f64()
        .ok_or(EvalError::InvalidOperands(UNREPRESENTABLE))?;
    pow_via_f64_exponent(base, exp)
}

fn pow_via_f64_exponent(base: Decimal, exp: f64) -> Result<Decimal, EvalError> {
    let base = base
        .to_f64()
        .ok_or(EvalError::InvalidOperands(UNREPRESENTABLE))?;
    let raised = base.powf(exp);
    Decimal::from_f64(raised).ok_or(EvalError::InvalidOperands(UNREPRESENTABLE))
}
