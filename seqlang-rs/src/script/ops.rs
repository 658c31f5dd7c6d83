//! Binary operator registry.
//!
//! Each operator answers two questions through one dispatch table: what type
//! does it produce for a pair of operand types, and what value for a pair of
//! operand values.  Value application always goes through the type rule
//! first, so the checker and the evaluator can never disagree about which
//! operand pairs are legal or how they promote.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{Error, RuntimeError, TypeError};
use super::types::Type;
use super::value::Value;

/// A typed binary operator.
pub trait BinaryOperator: Send + Sync {
    /// Static rule: result type for the operand types, or why they are illegal.
    fn result_type(&self, left: &Type, right: &Type) -> Result<Type, TypeError>;

    /// Apply to concrete operands.
    fn apply(&self, left: &Value, right: &Value) -> Result<Value, Error>;
}

/// Int ⊗ Int stays Int; any pairing with a Real promotes to Real; anything
/// else is an error naming both types.
pub fn promote(left: &Type, right: &Type) -> Result<Type, TypeError> {
    match (left, right) {
        (Type::Int, Type::Int) => Ok(Type::Int),
        (Type::Int | Type::Real, Type::Int | Type::Real) => Ok(Type::Real),
        _ => Err(TypeError::OperandTypes {
            left: left.clone(),
            right: right.clone(),
        }),
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

type IntFn = fn(i64, i64) -> Result<i64, RuntimeError>;
type RealFn = fn(f64, f64) -> f64;

/// `+ - * /`: typed by [`promote`].
pub struct Arithmetic {
    int: IntFn,
    real: RealFn,
}

impl Arithmetic {
    pub fn new(int: IntFn, real: RealFn) -> Self {
        Arithmetic { int, real }
    }
}

impl BinaryOperator for Arithmetic {
    fn result_type(&self, left: &Type, right: &Type) -> Result<Type, TypeError> {
        promote(left, right)
    }

    fn apply(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        let ty = self.result_type(&left.type_of(), &right.type_of())?;
        match (ty, left, right) {
            (Type::Int, Value::Int(a), Value::Int(b)) => Ok(Value::Int((self.int)(*a, *b)?)),
            (_, l, r) => match (l.as_real(), r.as_real()) {
                (Some(a), Some(b)) => Ok(Value::Real((self.real)(a, b))),
                _ => Err(TypeError::OperandTypes {
                    left: l.type_of(),
                    right: r.type_of(),
                }
                .into()),
            },
        }
    }
}

/// `^`: Real for any numeric pair, even two Ints.
pub struct Power;

impl BinaryOperator for Power {
    fn result_type(&self, left: &Type, right: &Type) -> Result<Type, TypeError> {
        promote(left, right).map(|_| Type::Real)
    }

    fn apply(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        self.result_type(&left.type_of(), &right.type_of())?;
        match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => Ok(Value::Real(a.powf(b))),
            _ => Err(TypeError::OperandTypes {
                left: left.type_of(),
                right: right.type_of(),
            }
            .into()),
        }
    }
}

fn int_add(a: i64, b: i64) -> Result<i64, RuntimeError> {
    a.checked_add(b).ok_or(RuntimeError::Overflow { op: "+" })
}

fn int_sub(a: i64, b: i64) -> Result<i64, RuntimeError> {
    a.checked_sub(b).ok_or(RuntimeError::Overflow { op: "-" })
}

fn int_mul(a: i64, b: i64) -> Result<i64, RuntimeError> {
    a.checked_mul(b).ok_or(RuntimeError::Overflow { op: "*" })
}

/// Truncates toward zero.
fn int_div(a: i64, b: i64) -> Result<i64, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    a.checked_div(b).ok_or(RuntimeError::Overflow { op: "/" })
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Operator symbol → implementation.
#[derive(Clone, Default)]
pub struct Operators {
    table: HashMap<String, Arc<dyn BinaryOperator>>,
}

impl Operators {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// `+ - * /` with Int/Real promotion and `^` yielding Real.
    pub fn standard() -> Self {
        Operators::new()
            .with("+", Arithmetic::new(int_add, |a, b| a + b))
            .with("-", Arithmetic::new(int_sub, |a, b| a - b))
            .with("*", Arithmetic::new(int_mul, |a, b| a * b))
            .with("/", Arithmetic::new(int_div, |a, b| a / b))
            .with("^", Power)
    }

    pub fn with(mut self, symbol: impl Into<String>, op: impl BinaryOperator + 'static) -> Self {
        self.table.insert(symbol.into(), Arc::new(op));
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&dyn BinaryOperator> {
        self.table.get(symbol).map(|op| op.as_ref())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Operators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut symbols: Vec<_> = self.symbols().collect();
        symbols.sort_unstable();
        f.debug_struct("Operators").field("symbols", &symbols).finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
