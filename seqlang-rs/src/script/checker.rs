//! Static type checker.
//!
//! Walks statements in order against a private name → type table, failing on
//! the first error.  Checking never evaluates anything; lambda bodies are
//! inferred when a function's type rule applies them to argument types.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use super::ast::{Expr, Id, Literal, Program, Stmt};
use super::error::TypeError;
use super::registry::Registry;
use super::types::{LambdaType, Type};

/// Parameter bindings of one lambda application, chained to the scope the
/// lambda was written in.
struct TypeFrame {
    vars: HashMap<String, Type>,
    parent: Option<Rc<TypeFrame>>,
}

impl TypeFrame {
    fn lookup(&self, name: &str) -> Option<Type> {
        match self.vars.get(name) {
            Some(ty) => Some(ty.clone()),
            None => self.parent.as_ref()?.lookup(name),
        }
    }
}

enum Scope<'g> {
    Global(&'g HashMap<String, Type>),
    Frame(Rc<TypeFrame>),
}

impl Scope<'_> {
    fn lookup(&self, name: &str) -> Option<Type> {
        match self {
            Scope::Global(vars) => vars.get(name).cloned(),
            Scope::Frame(frame) => frame.lookup(name),
        }
    }

    /// The scope a lambda closes over.
    fn capture(&self) -> Rc<TypeFrame> {
        match self {
            Scope::Global(vars) => Rc::new(TypeFrame {
                vars: (*vars).clone(),
                parent: None,
            }),
            Scope::Frame(frame) => Rc::clone(frame),
        }
    }
}

/// The checker's persistent state: every variable declared so far.
#[derive(Debug, Clone)]
pub struct TypeChecker {
    globals: HashMap<String, Type>,
    registry: Arc<Registry>,
}

impl TypeChecker {
    pub fn new(registry: Arc<Registry>) -> Self {
        TypeChecker {
            globals: HashMap::new(),
            registry,
        }
    }

    /// Independent checker with the same declarations, for speculative
    /// checking that must not disturb this one.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn declared(&self, name: &str) -> Option<&Type> {
        self.globals.get(name)
    }

    pub fn check_program(&mut self, program: &Program) -> Result<(), TypeError> {
        program.statements.iter().try_for_each(|stmt| self.check(stmt))
    }

    pub fn check(&mut self, stmt: &Stmt) -> Result<(), TypeError> {
        match stmt {
            Stmt::PrintString(_) => Ok(()),
            Stmt::OutExpr(expr) => {
                let ty = self.infer(expr)?;
                if printable(&ty) {
                    Ok(())
                } else {
                    Err(TypeError::NotPrintable {
                        found: ty,
                        pos: expr.pos(),
                    })
                }
            }
            Stmt::VarDeclaration { name, expr } => {
                if self.globals.contains_key(&name.name) {
                    return Err(TypeError::Redeclared {
                        name: name.name.clone(),
                        pos: name.pos,
                    });
                }
                let ty = self.infer(expr)?;
                self.globals.insert(name.name.clone(), ty);
                Ok(())
            }
        }
    }

    /// Type of `expr` in the global scope.
    pub fn infer(&self, expr: &Expr) -> Result<Type, TypeError> {
        infer(&self.registry, expr, &Scope::Global(&self.globals))
    }
}

fn printable(ty: &Type) -> bool {
    match ty {
        Type::Lambda(_) => false,
        Type::Seq(elem) => printable(elem),
        _ => true,
    }
}

fn infer(registry: &Arc<Registry>, expr: &Expr, scope: &Scope<'_>) -> Result<Type, TypeError> {
    match expr {
        Expr::NInt(lit) => int_literal(lit).map(|_| Type::Int),
        Expr::NReal(lit) => real_literal(lit).map(|_| Type::Real),
        Expr::Id(id) => scope.lookup(&id.name).ok_or_else(|| TypeError::Undeclared {
            name: id.name.clone(),
            pos: id.pos,
        }),
        Expr::NSequence { left, right } => {
            for bound in [left, right] {
                let ty = infer(registry, bound, scope)?;
                if ty != Type::Int {
                    return Err(TypeError::RangeBound {
                        pos: bound.pos(),
                        found: ty,
                    });
                }
            }
            Ok(Type::seq(Type::Int))
        }
        Expr::BinOp { left, op, right } => {
            let l = infer(registry, left, scope)?;
            let r = infer(registry, right, scope)?;
            let operator =
                registry
                    .operators
                    .get(&op.symbol)
                    .ok_or_else(|| TypeError::UnknownOperator {
                        op: op.symbol.clone(),
                        pos: op.pos,
                    })?;
            operator
                .result_type(&l, &r)
                .map_err(|e| TypeError::AtOperator {
                    op: op.symbol.clone(),
                    pos: op.pos,
                    source: Box::new(e),
                })
        }
        Expr::FuncCall { name, args } => {
            let function =
                registry
                    .functions
                    .get(&name.name)
                    .ok_or_else(|| TypeError::UnknownFunction {
                        name: name.name.clone(),
                        pos: name.pos,
                    })?;
            let arg_types = args
                .iter()
                .map(|a| infer(registry, a, scope))
                .collect::<Result<Vec<_>, _>>()?;
            function
                .result_type(arg_types)
                .map_err(|e| TypeError::InFunction {
                    name: name.name.clone(),
                    pos: name.pos,
                    source: Box::new(e),
                })
        }
        Expr::Lambda { params, body } => lambda_type(registry, params, body, scope),
    }
}

fn lambda_type(
    registry: &Arc<Registry>,
    params: &[Id],
    body: &Expr,
    scope: &Scope<'_>,
) -> Result<Type, TypeError> {
    for (i, p) in params.iter().enumerate() {
        if params[..i].contains(p) {
            return Err(TypeError::DuplicateParam {
                name: p.name.clone(),
                pos: p.pos,
            });
        }
    }

    let registry = Arc::clone(registry);
    let captured = scope.capture();
    let names: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
    let body = Rc::new(body.clone());

    Ok(Type::Lambda(LambdaType::new(names.len(), move |args| {
        let frame = TypeFrame {
            vars: names.iter().cloned().zip(args).collect(),
            parent: Some(Rc::clone(&captured)),
        };
        infer(&registry, &body, &Scope::Frame(Rc::new(frame)))
    })))
}

pub(crate) fn int_literal(lit: &Literal) -> Result<i64, TypeError> {
    lit.text.parse().map_err(|_| TypeError::InvalidLiteral {
        text: lit.text.clone(),
        kind: "Int",
        pos: lit.pos,
    })
}

pub(crate) fn real_literal(lit: &Literal) -> Result<f64, TypeError> {
    lit.text.parse().map_err(|_| TypeError::InvalidLiteral {
        text: lit.text.clone(),
        kind: "Real",
        pos: lit.pos,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ast::Pos;
    use crate::script::stmt::parse_program;

    fn checker() -> TypeChecker {
        TypeChecker::new(Registry::standard())
    }

    fn check(src: &str) -> Result<TypeChecker, TypeError> {
        let mut c = checker();
        c.check_program(&parse_program(src).expect("parse failed"))?;
        Ok(c)
    }

    fn type_of(src: &str) -> Result<Type, TypeError> {
        let c = check(&format!("var result = {src}"))?;
        Ok(c.declared("result").cloned().expect("declared"))
    }

    fn innermost(err: &TypeError) -> &TypeError {
        match err {
            TypeError::AtOperator { source, .. } | TypeError::InFunction { source, .. } => {
                innermost(source)
            }
            other => other,
        }
    }

    #[test]
    fn literals_and_promotion() {
        assert_eq!(type_of("1"), Ok(Type::Int));
        assert_eq!(type_of("1.5"), Ok(Type::Real));
        assert_eq!(type_of("1 + 2 * 3"), Ok(Type::Int));
        assert_eq!(type_of("1 + 2.0"), Ok(Type::Real));
        assert_eq!(type_of("2 ^ 3"), Ok(Type::Real));
    }

    #[test]
    fn ranges_are_int_sequences() {
        assert_eq!(type_of("{1, 5}"), Ok(Type::seq(Type::Int)));
        assert_eq!(type_of("{5, 1}"), Ok(Type::seq(Type::Int)));
    }

    #[test]
    fn range_bounds_must_be_int() {
        let err = type_of("{1, 2.5}").unwrap_err();
        assert_eq!(
            err,
            TypeError::RangeBound {
                pos: Pos::new(1, 18),
                found: Type::Real,
            }
        );
    }

    #[test]
    fn map_and_reduce() {
        assert_eq!(type_of("map({1, 3}, x -> x * 2)"), Ok(Type::seq(Type::Int)));
        assert_eq!(type_of("map({1, 3}, x -> x / 2.0)"), Ok(Type::seq(Type::Real)));
        assert_eq!(type_of("reduce({1, 3}, 0, a b -> a + b)"), Ok(Type::Int));
        assert_eq!(
            type_of("map(map({1, 3}, x -> {1, x}), s -> reduce(s, 0, a b -> a + b))"),
            Ok(Type::seq(Type::Int))
        );
    }

    #[test]
    fn reduce_result_type_is_stable() {
        let err = type_of("reduce({1, 3}, 0, a b -> a + b * 1.5)").unwrap_err();
        assert_eq!(
            innermost(&err),
            &TypeError::ReduceResult {
                expected: Type::Int,
                found: Type::Real,
            }
        );
        assert_eq!(type_of("reduce({1, 3}, 0.0, a b -> a + b)"), Ok(Type::Real));
    }

    #[test]
    fn undeclared_variable() {
        assert_eq!(
            check("out x").unwrap_err(),
            TypeError::Undeclared {
                name: "x".into(),
                pos: Pos::new(1, 5),
            }
        );
    }

    #[test]
    fn redeclaration() {
        assert_eq!(
            check("var x = 1  var x = 2").unwrap_err(),
            TypeError::Redeclared {
                name: "x".into(),
                pos: Pos::new(1, 16),
            }
        );
    }

    #[test]
    fn operator_errors_carry_position() {
        let err = check("var s = {1, 2}\nout s + 1").unwrap_err();
        let TypeError::AtOperator { op, pos, source } = err else {
            panic!("expected operator error, got {err:?}");
        };
        assert_eq!(op, "+");
        assert_eq!(pos, Pos::new(2, 7));
        assert_eq!(
            *source,
            TypeError::OperandTypes {
                left: Type::seq(Type::Int),
                right: Type::Int,
            }
        );
    }

    #[test]
    fn function_errors() {
        let err = check("out map(1, 2, 3)").unwrap_err();
        assert!(matches!(
            innermost(&err),
            TypeError::ArgCount {
                name: "map",
                expected: 2,
                found: 3,
            }
        ));
        assert!(matches!(
            check("out filter({1, 2}, x -> x)"),
            Err(TypeError::UnknownFunction { .. })
        ));
        let err = check("out map({1, 2}, a b -> a)").unwrap_err();
        assert!(matches!(innermost(&err), TypeError::LambdaArity { index: 2, .. }));
        let err = check("out reduce({1, 2}, x -> x, a b -> a)").unwrap_err();
        assert_eq!(innermost(&err), &TypeError::LambdaInitial { index: 2 });
    }

    #[test]
    fn lambda_body_is_checked_on_application() {
        let err = check("out map({1, 2}, x -> y)").unwrap_err();
        assert!(matches!(innermost(&err), TypeError::Undeclared { name, .. } if name == "y"));
    }

    #[test]
    fn lambdas_close_over_globals_and_outer_params() {
        assert!(check("var k = 2.0\nout map({1, 3}, x -> x * k)").is_ok());
        assert_eq!(
            type_of("map({1, 3}, x -> map({1, x}, y -> x + y * 0.5))"),
            Ok(Type::seq(Type::seq(Type::Real)))
        );
    }

    #[test]
    fn duplicate_params() {
        let err = check("out reduce({1, 2}, 0, a a -> a)").unwrap_err();
        assert!(matches!(err, TypeError::DuplicateParam { name, .. } if name == "a"));
    }

    #[test]
    fn lambdas_are_not_printable() {
        let lambda = Expr::lambda(
            vec![Id::new("x", Pos::new(1, 5))],
            Expr::Id(Id::new("x", Pos::new(1, 10))),
        );
        assert!(matches!(
            checker().check(&Stmt::OutExpr(lambda)),
            Err(TypeError::NotPrintable { found: Type::Lambda(_), .. })
        ));
    }

    #[test]
    fn oversized_literal() {
        assert!(matches!(
            check("out 99999999999999999999"),
            Err(TypeError::InvalidLiteral { kind: "Int", .. })
        ));
    }

    #[test]
    fn copy_is_independent() {
        let base = check("var a = 1").unwrap();
        let mut trial = base.copy();
        trial
            .check_program(&parse_program("var b = a + 1").unwrap())
            .unwrap();
        assert!(trial.declared("b").is_some());
        assert!(base.declared("b").is_none());
    }

    #[test]
    fn failure_stops_at_first_statement() {
        let mut c = checker();
        let program = parse_program("var a = 1 out nope var b = 2").unwrap();
        assert!(c.check_program(&program).is_err());
        assert!(c.declared("a").is_some());
        assert!(c.declared("b").is_none());
    }
}
