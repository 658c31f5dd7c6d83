//! Statement and program grammar.
//!
//! ```text
//! statement := ('var' id '=' expr) | ('out' expr) | ('print' string)
//! program   := statement*
//! ```
//!
//! Statements need no separator; a program is any run of statements, laid
//! out however the author likes.  The whole input must be consumed, and no
//! partial program is returned on failure.

use super::ast::{Program, Stmt};
use super::error::Error;
use super::expr::Parser;
use super::lexer::{tokenize, TokenKind};
use super::priority::OperatorsPriority;

/// Parse a program using the default operator priorities.
pub fn parse_program(src: &str) -> Result<Program, Error> {
    parse_program_with(src, &OperatorsPriority::default())
}

/// Parse a program with a caller-supplied priority table.
pub fn parse_program_with(src: &str, priority: &OperatorsPriority) -> Result<Program, Error> {
    let tokens = tokenize(src)?;
    let mut parser = Parser::new(tokens, priority);
    let mut statements = Vec::new();
    while !parser.at_eof() {
        match parser.parse_statement() {
            Some(stmt) => statements.push(stmt),
            None => return Err(parser.error().into()),
        }
    }
    Ok(Program::new(statements))
}

impl Parser<'_> {
    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek().kind {
            TokenKind::Var => {
                self.eat(TokenKind::Var)?;
                let name = self.parse_id()?;
                self.eat(TokenKind::Assign)?;
                let expr = self.parse_expr()?;
                Some(Stmt::VarDeclaration { name, expr })
            }
            TokenKind::Out => {
                self.eat(TokenKind::Out)?;
                Some(Stmt::OutExpr(self.parse_expr()?))
            }
            TokenKind::Print => {
                self.eat(TokenKind::Print)?;
                let tok = self.eat(TokenKind::Str)?;
                Some(Stmt::PrintString(unquote(&tok.text).to_owned()))
            }
            _ => {
                self.note("statement");
                None
            }
        }
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
