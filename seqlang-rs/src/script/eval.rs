//! Tree-walking evaluator.
//!
//! Holds the global environment of a session and runs one statement at a
//! time.  Lambdas close over the scope they were created in; every call binds
//! its parameters in a fresh [`Frame`] chained to that scope.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use super::ast::{Expr, Id, Stmt};
use super::checker::{int_literal, real_literal};
use super::error::{Error, RuntimeError, TypeError};
use super::output::Output;
use super::registry::Registry;
use super::types::Type;
use super::value::{Lambda, Value};

/// One lambda invocation's parameter bindings.
struct Frame {
    vars: HashMap<String, Value>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    fn lookup(&self, name: &str) -> Option<Value> {
        match self.vars.get(name) {
            Some(v) => Some(v.clone()),
            None => self.parent.as_ref()?.lookup(name),
        }
    }
}

enum Scope<'g> {
    Global(&'g HashMap<String, Value>),
    Frame(Rc<Frame>),
}

impl Scope<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        match self {
            Scope::Global(vars) => vars.get(name).cloned(),
            Scope::Frame(frame) => frame.lookup(name),
        }
    }

    fn capture(&self) -> Rc<Frame> {
        match self {
            Scope::Global(vars) => Rc::new(Frame {
                vars: (*vars).clone(),
                parent: None,
            }),
            Scope::Frame(frame) => Rc::clone(frame),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    globals: HashMap<String, Value>,
    registry: Arc<Registry>,
}

impl Evaluator {
    pub fn new(registry: Arc<Registry>) -> Self {
        Evaluator {
            globals: HashMap::new(),
            registry,
        }
    }

    /// Value bound to a global name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Execute one statement, writing any output to `out`.
    pub fn run(&mut self, stmt: &Stmt, out: &mut dyn Output) -> Result<(), Error> {
        match stmt {
            Stmt::PrintString(text) => out.print(text),
            Stmt::OutExpr(expr) => {
                let value = self.eval(expr)?;
                out.print(&value.render()?);
            }
            Stmt::VarDeclaration { name, expr } => {
                if self.globals.contains_key(&name.name) {
                    return Err(RuntimeError::Redeclared {
                        name: name.name.clone(),
                        pos: name.pos,
                    }
                    .into());
                }
                let value = self.eval(expr)?;
                self.globals.insert(name.name.clone(), value);
            }
        }
        Ok(())
    }

    /// Value of `expr` in the global scope.
    pub fn eval(&self, expr: &Expr) -> Result<Value, Error> {
        eval(&self.registry, expr, &Scope::Global(&self.globals))
    }
}

fn eval(registry: &Arc<Registry>, expr: &Expr, scope: &Scope<'_>) -> Result<Value, Error> {
    match expr {
        Expr::NInt(lit) => Ok(Value::Int(int_literal(lit)?)),
        Expr::NReal(lit) => Ok(Value::Real(real_literal(lit)?)),
        Expr::Id(id) => scope.lookup(&id.name).ok_or_else(|| {
            RuntimeError::Unbound {
                name: id.name.clone(),
                pos: id.pos,
            }
            .into()
        }),
        Expr::NSequence { left, right } => {
            let lo = range_bound(registry, left, scope)?;
            let hi = range_bound(registry, right, scope)?;
            let elements = range(lo, hi).ok_or_else(|| RuntimeError::RangeTooLarge {
                pos: expr.pos(),
                len: range_len(lo, hi),
            })?;
            Ok(Value::seq(elements, Type::Int))
        }
        Expr::BinOp { left, op, right } => {
            let l = eval(registry, left, scope)?;
            let r = eval(registry, right, scope)?;
            let at_op = |source: Error| RuntimeError::AtOperator {
                op: op.symbol.clone(),
                pos: op.pos,
                source: Box::new(source),
            };
            match registry.operators.get(&op.symbol) {
                Some(operator) => operator.apply(&l, &r).map_err(|e| at_op(e).into()),
                None => Err(TypeError::UnknownOperator {
                    op: op.symbol.clone(),
                    pos: op.pos,
                }
                .into()),
            }
        }
        Expr::FuncCall { name, args } => {
            let function = registry.functions.get(&name.name).ok_or_else(|| {
                TypeError::UnknownFunction {
                    name: name.name.clone(),
                    pos: name.pos,
                }
            })?;
            let values = args
                .iter()
                .map(|a| eval(registry, a, scope))
                .collect::<Result<Vec<_>, _>>()?;
            function.call(values).map_err(|e| {
                RuntimeError::InFunction {
                    name: name.name.clone(),
                    pos: name.pos,
                    source: Box::new(e),
                }
                .into()
            })
        }
        Expr::Lambda { params, body } => Ok(lambda(registry, params, body, scope)),
    }
}

fn range_bound(registry: &Arc<Registry>, expr: &Expr, scope: &Scope<'_>) -> Result<i64, Error> {
    let value = eval(registry, expr, scope)?;
    value.as_int().ok_or_else(|| {
        RuntimeError::RangeBound {
            pos: expr.pos(),
            found: value.type_of(),
        }
        .into()
    })
}

/// Element count of `{lo, hi}`; zero when descending.
fn range_len(lo: i64, hi: i64) -> u128 {
    (i128::from(hi) - i128::from(lo) + 1).max(0).unsigned_abs()
}

/// `lo..=hi` materialized, or `None` when it can't be allocated.
fn range(lo: i64, hi: i64) -> Option<Vec<Value>> {
    let len = usize::try_from(range_len(lo, hi)).ok()?;
    let mut elements = Vec::new();
    elements.try_reserve_exact(len).ok()?;
    elements.extend((lo..=hi).map(Value::Int));
    Some(elements)
}

fn lambda(registry: &Arc<Registry>, params: &[Id], body: &Expr, scope: &Scope<'_>) -> Value {
    let registry = Arc::clone(registry);
    let captured = scope.capture();
    let names: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
    let body = Rc::new(body.clone());

    Value::Lambda(Lambda::new(names.len(), move |args| {
        let frame = Frame {
            vars: names.iter().cloned().zip(args).collect(),
            parent: Some(Rc::clone(&captured)),
        };
        eval(&registry, &body, &Scope::Frame(Rc::new(frame)))
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
