//! Runtime values.
//!
//! Values are immutable.  Sequences share their element storage, so cloning a
//! value (to bind it, capture it, or pass it to a lambda) is cheap.

use std::fmt;
use std::rc::Rc;

use super::error::{Error, RuntimeError};
use super::types::{LambdaType, Type};

type InvokeFn = dyn Fn(Vec<Value>) -> Result<Value, Error>;

/// A seqlang runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Real(f64),
    /// Homogeneous sequence; `elem` is the element type.
    Seq { elements: Rc<Vec<Value>>, elem: Type },
    Lambda(Lambda),
}

impl Value {
    pub fn seq(elements: Vec<Value>, elem: Type) -> Self {
        Value::Seq {
            elements: Rc::new(elements),
            elem,
        }
    }

    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Real(_) => Type::Real,
            Value::Seq { elem, .. } => Type::seq(elem.clone()),
            Value::Lambda(l) => Type::Lambda(LambdaType::opaque(l.arity())),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`; Ints promote, nothing demotes.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq { elements, .. } => Some(elements.as_slice()),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&Lambda> {
        match self {
            Value::Lambda(l) => Some(l),
            _ => None,
        }
    }

    /// Text written by `out`.  Lambdas have no textual form.
    pub fn render(&self) -> Result<String, RuntimeError> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    fn render_into(&self, out: &mut String) -> Result<(), RuntimeError> {
        match self {
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Real(x) => out.push_str(&format_real(*x)),
            Value::Seq { elements, .. } => {
                out.push('[');
                for (i, v) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    v.render_into(out)?;
                }
                out.push(']');
            }
            Value::Lambda(_) => return Err(RuntimeError::LambdaOutput),
        }
        Ok(())
    }
}

/// Reals always show a fractional part so they never read as Ints.
fn format_real(x: f64) -> String {
    let mut s = format!("{x}");
    if x.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::Seq { elements: a, .. }, Value::Seq { elements: b, .. }) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(&a.invoke, &b.invoke),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

// ── Lambda ────────────────────────────────────────────────────────────────────

/// A callable closure value: its arity plus the invoker that binds arguments
/// and evaluates the body.
#[derive(Clone)]
pub struct Lambda {
    arity: usize,
    invoke: Rc<InvokeFn>,
}

impl Lambda {
    pub fn new<F>(arity: usize, invoke: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, Error> + 'static,
    {
        Lambda {
            arity,
            invoke: Rc::new(invoke),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<lambda/{}>", self.arity)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
