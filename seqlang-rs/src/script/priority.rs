//! Table-driven precedence folding.
//!
//! The grammar reads an expression as a flat list `a0 op0 a1 op1 … an`.
//! [`OperatorsPriority::fold`] turns that list into a tree one priority level
//! at a time, highest level first.  Every operator is left-associative.
//!
//! For terms `[a, b, c, d]` and operators `[+, *, -]` the result is
//! `((a + (b * c)) - d)`.

use super::ast::{Expr, Op};

/// Operator symbols grouped by priority; `levels[0]` binds tightest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorsPriority {
    levels: Vec<Vec<String>>,
}

/// The fold ended with leftovers; the priority table does not cover every
/// operator the grammar produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldError {
    pub terms_left: usize,
    pub ops_left: Vec<String>,
}

impl std::fmt::Display for FoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "internal error: precedence fold left {} terms and operators [{}]",
            self.terms_left,
            self.ops_left.join(", ")
        )
    }
}

impl std::error::Error for FoldError {}

impl Default for OperatorsPriority {
    fn default() -> Self {
        OperatorsPriority::new([vec!["^"], vec!["*", "/"], vec!["+", "-"]])
    }
}

impl OperatorsPriority {
    pub fn new<L, S>(levels: L) -> Self
    where
        L: IntoIterator,
        L::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OperatorsPriority {
            levels: levels
                .into_iter()
                .map(|level| level.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn levels(&self) -> &[Vec<String>] {
        &self.levels
    }

    /// Does any level mention `symbol`?
    pub fn knows(&self, symbol: &str) -> bool {
        self.levels.iter().flatten().any(|s| s == symbol)
    }

    /// Fold `terms` (n) and `ops` (n − 1) into a single expression.
    pub fn fold(&self, terms: Vec<Expr>, ops: Vec<Op>) -> Result<Expr, FoldError> {
        let mut terms = terms;
        let mut ops = ops;
        if terms.len() != ops.len() + 1 {
            return Err(FoldError {
                terms_left: terms.len(),
                ops_left: ops.into_iter().map(|o| o.symbol).collect(),
            });
        }

        for level in &self.levels {
            if ops.is_empty() {
                break;
            }
            (terms, ops) = fold_level(terms, ops, level);
        }

        if terms.len() == 1 && ops.is_empty() {
            if let Some(expr) = terms.pop() {
                return Ok(expr);
            }
        }
        Err(FoldError {
            terms_left: terms.len(),
            ops_left: ops.into_iter().map(|o| o.symbol).collect(),
        })
    }
}

/// One left-to-right pass: every operator in `level` swallows its left
/// neighbour (possibly already folded in this pass) and its right operand.
fn fold_level(terms: Vec<Expr>, ops: Vec<Op>, level: &[String]) -> (Vec<Expr>, Vec<Op>) {
    let mut terms = terms.into_iter();
    let mut out_terms = Vec::with_capacity(terms.len());
    let mut out_ops = Vec::with_capacity(ops.len());

    if let Some(first) = terms.next() {
        out_terms.push(first);
    }
    for (op, right) in ops.into_iter().zip(terms) {
        if level.iter().any(|s| *s == op.symbol) {
            if let Some(left) = out_terms.pop() {
                out_terms.push(Expr::bin_op(left, op, right));
            }
        } else {
            out_terms.push(right);
            out_ops.push(op);
        }
    }
    (out_terms, out_ops)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ast::{Id, Pos};

    fn id(name: &str) -> Expr {
        Expr::Id(Id::new(name, Pos::default()))
    }

    fn op(symbol: &str) -> Op {
        Op::new(symbol, Pos::default())
    }

    #[test]
    fn mixed_levels() {
        let p = OperatorsPriority::default();
        let got = p
            .fold(
                vec![id("a"), id("b"), id("c"), id("d")],
                vec![op("+"), op("*"), op("-")],
            )
            .unwrap();
        let want = Expr::bin_op(
            Expr::bin_op(id("a"), op("+"), Expr::bin_op(id("b"), op("*"), id("c"))),
            op("-"),
            id("d"),
        );
        assert_eq!(got, want);
    }

    #[test]
    fn left_associative_within_level() {
        let p = OperatorsPriority::default();
        let got = p
            .fold(vec![id("a"), id("b"), id("c")], vec![op("-"), op("-")])
            .unwrap();
        let want = Expr::bin_op(Expr::bin_op(id("a"), op("-"), id("b")), op("-"), id("c"));
        assert_eq!(got, want);
    }

    #[test]
    fn power_is_left_associative_too() {
        let p = OperatorsPriority::default();
        let got = p
            .fold(vec![id("a"), id("b"), id("c")], vec![op("^"), op("^")])
            .unwrap();
        let want = Expr::bin_op(Expr::bin_op(id("a"), op("^"), id("b")), op("^"), id("c"));
        assert_eq!(got, want);
    }

    #[test]
    fn single_term() {
        let p = OperatorsPriority::default();
        assert_eq!(p.fold(vec![id("x")], vec![]).unwrap(), id("x"));
    }

    #[test]
    fn swapped_table_changes_shape() {
        let p = OperatorsPriority::new([vec!["+", "-"], vec!["*", "/"]]);
        let got = p
            .fold(vec![id("a"), id("b"), id("c")], vec![op("+"), op("*")])
            .unwrap();
        let want = Expr::bin_op(Expr::bin_op(id("a"), op("+"), id("b")), op("*"), id("c"));
        assert_eq!(got, want);
    }

    #[test]
    fn unknown_operator_is_an_internal_error() {
        let p = OperatorsPriority::new([vec!["+"]]);
        let err = p
            .fold(vec![id("a"), id("b")], vec![op("%")])
            .unwrap_err();
        assert_eq!(err.terms_left, 2);
        assert_eq!(err.ops_left, vec!["%".to_owned()]);
    }

    #[test]
    fn mismatched_lengths() {
        let p = OperatorsPriority::default();
        assert!(p.fold(vec![id("a")], vec![op("+")]).is_err());
    }

    #[test]
    fn knows() {
        let p = OperatorsPriority::default();
        assert!(p.knows("^"));
        assert!(!p.knows("%"));
    }
}
