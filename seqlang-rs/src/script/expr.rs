//! Expression grammar.
//!
//! ```text
//! atom     := funcCall | id | number | '(' expr ')' | '{' expr ',' expr '}'
//! expr     := atom (op atom)*            -- folded by OperatorsPriority
//! lambda   := id+ '->' expr
//! funcCall := id '(' (lambda|expr) (',' (lambda|expr))* ')'
//! number   := ('+'|'-')? (REAL|INT)
//! ```
//!
//! The parser backtracks between alternatives.  Each failed attempt records
//! what it expected at the token where it gave up; when nothing parses, the
//! error reports the furthest such token.

use super::ast::{Expr, Id, Literal, Op};
use super::error::{Error, ParseError};
use super::lexer::{tokenize, Token, TokenKind};
use super::priority::OperatorsPriority;

// ── Parser ────────────────────────────────────────────────────────────────────

/// Deepest nesting of parentheses, ranges and calls the parser accepts.
pub const MAX_NESTING: usize = 256;

pub(super) struct Parser<'p> {
    tokens: Vec<Token>,
    pos: usize,
    priority: &'p OperatorsPriority,
    furthest: usize,
    expected: Vec<&'static str>,
    depth: usize,
}

impl<'p> Parser<'p> {
    /// `tokens` must end with an `Eof` token, as produced by [`tokenize`].
    pub(super) fn new(tokens: Vec<Token>, priority: &'p OperatorsPriority) -> Self {
        Parser {
            tokens,
            pos: 0,
            priority,
            furthest: 0,
            expected: Vec::new(),
            depth: 0,
        }
    }

    pub(super) fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let t = self.peek().clone();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    pub(super) fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(super) fn mark(&self) -> usize {
        self.pos
    }

    pub(super) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    /// Record that `what` was expected at the current token.
    pub(super) fn note(&mut self, what: &'static str) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest && !self.expected.contains(&what) {
            self.expected.push(what);
        }
    }

    /// Consume a token of `kind`, or note it as expected.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek().kind == kind {
            Some(self.advance())
        } else {
            self.note(kind.describe());
            None
        }
    }

    /// Error describing the furthest point any alternative reached.
    pub(super) fn error(&self) -> ParseError {
        let last = self.tokens.len().saturating_sub(1);
        let tok = &self.tokens[self.furthest.min(last)];
        let mut expected = self.expected.clone();
        if expected.is_empty() {
            expected.push(TokenKind::Eof.describe());
        }
        ParseError {
            pos: tok.pos,
            found: tok.to_string(),
            expected,
        }
    }

    /// Run `f` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_NESTING {
            self.note("shallower nesting");
            return None;
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    pub(super) fn parse_expr(&mut self) -> Option<Expr> {
        let first = self.parse_atom()?;
        let mut terms = vec![first];
        let mut ops = Vec::new();
        loop {
            let mark = self.mark();
            let Some(op) = self.parse_op() else { break };
            match self.parse_atom() {
                Some(atom) => {
                    ops.push(op);
                    terms.push(atom);
                }
                None => {
                    self.reset(mark);
                    break;
                }
            }
        }
        match self.priority.fold(terms, ops) {
            Ok(expr) => Some(expr),
            Err(_) => {
                self.note("operator with a known priority");
                None
            }
        }
    }

    fn parse_op(&mut self) -> Option<Op> {
        let tok = self.peek();
        if tok.kind.is_operator() && self.priority.knows(&tok.text) {
            let tok = self.advance();
            Some(Op::new(tok.text, tok.pos))
        } else {
            self.note("operator");
            None
        }
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        match self.peek().kind {
            TokenKind::Ident => {
                if self.peek_kind_at(1) == TokenKind::LParen {
                    let mark = self.mark();
                    if let Some(call) = self.nested(Self::parse_func_call) {
                        return Some(call);
                    }
                    self.reset(mark);
                }
                self.parse_id().map(Expr::Id)
            }
            TokenKind::Plus | TokenKind::Minus | TokenKind::Int | TokenKind::Real => {
                self.parse_number()
            }
            TokenKind::LParen => self.nested(|p| {
                p.advance();
                let inner = p.parse_expr()?;
                p.eat(TokenKind::RParen)?;
                Some(inner)
            }),
            TokenKind::LBrace => self.nested(|p| {
                p.advance();
                let left = p.parse_expr()?;
                p.eat(TokenKind::Comma)?;
                let right = p.parse_expr()?;
                p.eat(TokenKind::RBrace)?;
                Some(Expr::sequence(left, right))
            }),
            _ => {
                self.note("expression");
                None
            }
        }
    }

    pub(super) fn parse_id(&mut self) -> Option<Id> {
        let tok = self.eat(TokenKind::Ident)?;
        Some(Id::new(tok.text, tok.pos))
    }

    fn parse_number(&mut self) -> Option<Expr> {
        let mark = self.mark();
        let negative = match self.peek().kind {
            TokenKind::Minus => {
                self.advance();
                true
            }
            TokenKind::Plus => {
                self.advance();
                false
            }
            _ => false,
        };
        let tok = self.peek().clone();
        let expr = match tok.kind {
            TokenKind::Int => Expr::NInt(Literal::new(normalize(&tok.text, negative), tok.pos)),
            TokenKind::Real => Expr::NReal(Literal::new(normalize(&tok.text, negative), tok.pos)),
            _ => {
                self.note("number");
                self.reset(mark);
                return None;
            }
        };
        self.advance();
        Some(expr)
    }

    fn parse_func_call(&mut self) -> Option<Expr> {
        let name = self.parse_id()?;
        self.eat(TokenKind::LParen)?;
        let mut args = vec![self.parse_arg()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            args.push(self.parse_arg()?);
        }
        self.eat(TokenKind::RParen)?;
        Some(Expr::FuncCall { name, args })
    }

    fn parse_arg(&mut self) -> Option<Expr> {
        let mark = self.mark();
        if let Some(lambda) = self.parse_lambda() {
            return Some(lambda);
        }
        self.reset(mark);
        self.parse_expr()
    }

    fn parse_lambda(&mut self) -> Option<Expr> {
        let mut params = vec![self.parse_id()?];
        while self.peek().kind == TokenKind::Ident {
            params.extend(self.parse_id());
        }
        self.eat(TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        Some(Expr::lambda(params, body))
    }
}

/// Digits with `_` separators dropped, prefixed by the grammar's sign.
fn normalize(digits: &str, negative: bool) -> String {
    let mut out = String::with_capacity(digits.len() + 1);
    if negative {
        out.push('-');
    }
    out.extend(digits.chars().filter(|&c| c != '_'));
    out
}

/// Parse a standalone expression with the default priority table.
pub fn parse_expr(src: &str) -> Result<Expr, Error> {
    let tokens = tokenize(src)?;
    let priority = OperatorsPriority::default();
    let mut parser = Parser::new(tokens, &priority);
    match parser.parse_expr() {
        Some(expr) if parser.at_eof() => Ok(expr),
        Some(_) => {
            parser.note(TokenKind::Eof.describe());
            Err(parser.error().into())
        }
        None => Err(parser.error().into()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ast::Pos;

    fn id(name: &str) -> Expr {
        Expr::Id(Id::new(name, Pos::default()))
    }

    fn int(text: &str) -> Expr {
        Expr::NInt(Literal::new(text, Pos::default()))
    }

    fn real(text: &str) -> Expr {
        Expr::NReal(Literal::new(text, Pos::default()))
    }

    fn op(symbol: &str) -> Op {
        Op::new(symbol, Pos::default())
    }

    fn parse(src: &str) -> Expr {
        parse_expr(src).expect("parse failed")
    }

    #[test]
    fn identifiers() {
        for name in ["id", "i", "i_2", "i2", "Word", "long_Word_12", "_1"] {
            assert_eq!(parse(name), id(name));
        }
    }

    #[test]
    fn integers() {
        assert_eq!(parse("1"), int("1"));
        assert_eq!(parse("125464"), int("125464"));
        assert_eq!(parse("+1"), int("1"));
        assert_eq!(parse("-2"), int("-2"));
        assert_eq!(parse("- 2"), int("-2"));
        assert_eq!(parse("9_000_000"), int("9000000"));
    }

    #[test]
    fn reals() {
        assert_eq!(parse("1.0"), real("1.0"));
        assert_eq!(parse("0."), real("0."));
        assert_eq!(parse("+1.0"), real("1.0"));
        assert_eq!(parse("-0.12"), real("-0.12"));
        assert_eq!(parse("12_34.56_78"), real("1234.5678"));
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse("1 + 2 * 3"),
            Expr::bin_op(int("1"), op("+"), Expr::bin_op(int("2"), op("*"), int("3")))
        );
        assert_eq!(
            parse("(1 + 2) * 3"),
            Expr::bin_op(Expr::bin_op(int("1"), op("+"), int("2")), op("*"), int("3"))
        );
    }

    #[test]
    fn minus_between_atoms_is_an_operator() {
        assert_eq!(parse("a -2"), Expr::bin_op(id("a"), op("-"), int("2")));
        assert_eq!(parse("1 - -2"), Expr::bin_op(int("1"), op("-"), int("-2")));
    }

    #[test]
    fn range_literal() {
        assert_eq!(parse("{1, n}"), Expr::sequence(int("1"), id("n")));
    }

    #[test]
    fn calls_with_lambdas() {
        assert_eq!(
            parse("map({1, 3}, i -> i * 2)"),
            Expr::FuncCall {
                name: Id::new("map", Pos::default()),
                args: vec![
                    Expr::sequence(int("1"), int("3")),
                    Expr::lambda(
                        vec![Id::new("i", Pos::default())],
                        Expr::bin_op(id("i"), op("*"), int("2"))
                    ),
                ],
            }
        );
        let Expr::FuncCall { args, .. } = parse("reduce(s, 0, i j -> i + j)") else {
            panic!("expected call");
        };
        assert!(matches!(&args[2], Expr::Lambda { params, .. } if params.len() == 2));
    }

    #[test]
    fn lambda_is_not_an_atom() {
        assert!(parse_expr("i -> i").is_err());
    }

    #[test]
    fn empty_call_is_rejected() {
        assert!(parse_expr("map()").is_err());
    }

    #[test]
    fn error_points_at_furthest_token() {
        let err = parse_expr("map({1, 3}, i -> )").unwrap_err();
        let Error::Parse(err) = err else { panic!("expected parse error") };
        assert_eq!(err.pos, Pos::new(1, 18));
        assert!(err.expected.contains(&"expression"));
    }

    fn nest(open: &str, close: &str, depth: usize) -> String {
        format!("{}1{}", open.repeat(depth), close.repeat(depth))
    }

    #[test]
    fn nesting_within_limit() {
        assert_eq!(parse(&nest("(", ")", MAX_NESTING)), int("1"));
        assert!(parse_expr(&nest("map({1, 2}, x -> ", ")", 100)).is_ok());
    }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        for (open, close) in [("(", ")"), ("{1, ", "}"), ("map(", ")")] {
            let err = parse_expr(&nest(open, close, 10_000)).unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "{open}: {err:?}");
        }
        let err = parse_expr(&nest("(", ")", MAX_NESTING + 1)).unwrap_err();
        let Error::Parse(err) = err else { panic!("expected parse error") };
        assert!(err.expected.contains(&"shallower nesting"));
    }

    #[test]
    fn trailing_tokens() {
        let err = parse_expr("1 2").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
