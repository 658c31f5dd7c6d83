//! Syntax tree for seqlang programs.
//!
//! Nodes are immutable once built.  Leaf nodes that come straight from a
//! token ([`Id`], [`Op`], [`Literal`]) remember where they were found, but
//! that position takes no part in equality or hashing: two trees parsed from
//! differently laid out source compare equal when they have the same shape.

use std::fmt;
use std::hash::{Hash, Hasher};

// ── Positions ─────────────────────────────────────────────────────────────────

/// 1-based line/column of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Pos { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

// ── Leaves ────────────────────────────────────────────────────────────────────

/// An identifier: variable, function, or lambda parameter name.
#[derive(Debug, Clone)]
pub struct Id {
    pub name: String,
    pub pos: Pos,
}

impl Id {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Id {
            name: name.into(),
            pos,
        }
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A binary operator symbol as written in the source.
#[derive(Debug, Clone)]
pub struct Op {
    pub symbol: String,
    pub pos: Pos,
}

impl Op {
    pub fn new(symbol: impl Into<String>, pos: Pos) -> Self {
        Op {
            symbol: symbol.into(),
            pos,
        }
    }
}

impl PartialEq for Op {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Op {}

impl Hash for Op {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

/// Numeric literal text, normalized (sign kept, `_` separators removed) but
/// not yet converted.  Conversion is deferred so that an out-of-range literal
/// becomes a checked error instead of a parse failure.
#[derive(Debug, Clone)]
pub struct Literal {
    pub text: String,
    pub pos: Pos,
}

impl Literal {
    pub fn new(text: impl Into<String>, pos: Pos) -> Self {
        Literal {
            text: text.into(),
            pos,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Literal {}

// ── Expressions & statements ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Id(Id),
    BinOp {
        left: Box<Expr>,
        op: Op,
        right: Box<Expr>,
    },
    /// `{left, right}` inclusive integer range.
    NSequence { left: Box<Expr>, right: Box<Expr> },
    FuncCall { name: Id, args: Vec<Expr> },
    Lambda { params: Vec<Id>, body: Box<Expr> },
    NInt(Literal),
    NReal(Literal),
}

impl Expr {
    pub fn bin_op(left: Expr, op: Op, right: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn sequence(left: Expr, right: Expr) -> Self {
        Expr::NSequence {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn lambda(params: Vec<Id>, body: Expr) -> Self {
        Expr::Lambda {
            params,
            body: Box::new(body),
        }
    }

    /// Position used when reporting on this node.
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Id(id) => id.pos,
            Expr::BinOp { op, .. } => op.pos,
            Expr::NSequence { left, .. } => left.pos(),
            Expr::FuncCall { name, .. } => name.pos,
            Expr::Lambda { params, body } => params.first().map_or_else(|| body.pos(), |p| p.pos),
            Expr::NInt(lit) | Expr::NReal(lit) => lit.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var name = expr`
    VarDeclaration { name: Id, expr: Expr },
    /// `out expr`
    OutExpr(Expr),
    /// `print "text"`
    PrintString(String),
}

/// An ordered sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Program { statements }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_position() {
        let a = Expr::bin_op(
            Expr::Id(Id::new("x", Pos::new(1, 1))),
            Op::new("+", Pos::new(1, 3)),
            Expr::NInt(Literal::new("2", Pos::new(1, 5))),
        );
        let b = Expr::bin_op(
            Expr::Id(Id::new("x", Pos::new(4, 10))),
            Op::new("+", Pos::new(5, 1)),
            Expr::NInt(Literal::new("2", Pos::new(7, 2))),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn literal_kind_matters() {
        let int = Expr::NInt(Literal::new("1", Pos::default()));
        let real = Expr::NReal(Literal::new("1", Pos::default()));
        assert_ne!(int, real);
    }

    #[test]
    fn ids_hash_by_name() {
        let mut set = HashSet::new();
        set.insert(Id::new("i", Pos::new(1, 1)));
        assert!(set.contains(&Id::new("i", Pos::new(9, 9))));
        assert!(!set.contains(&Id::new("j", Pos::new(1, 1))));
    }

    #[test]
    fn node_positions() {
        let seq = Expr::sequence(
            Expr::NInt(Literal::new("1", Pos::new(2, 2))),
            Expr::NInt(Literal::new("3", Pos::new(2, 5))),
        );
        assert_eq!(seq.pos(), Pos::new(2, 2));
        let lam = Expr::lambda(
            vec![Id::new("i", Pos::new(3, 4))],
            Expr::Id(Id::new("i", Pos::new(3, 9))),
        );
        assert_eq!(lam.pos(), Pos::new(3, 4));
    }

    #[test]
    fn pos_display() {
        assert_eq!(Pos::new(12, 3).to_string(), "12:3");
    }
}
