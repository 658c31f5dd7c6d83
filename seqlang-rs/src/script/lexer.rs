//! Regex-driven tokenizer.
//!
//! Rules are tried in declaration order at the current offset and the first
//! one that matches wins, so ordering matters: keywords shadow identifiers,
//! `->` shadows `-`, and `+`/`-` are always operators (a numeric sign is
//! attached later by the grammar).  Whitespace runs are matched and dropped.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::ast::Pos;
use super::error::LexError;

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Var,
    Out,
    Print,

    // Punctuation
    Assign,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Arrow,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    // Payload-bearing
    Ident,
    Real,
    Int,
    Str,

    Eof,
}

impl TokenKind {
    /// How the kind is described in parse errors.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Var => "'var'",
            TokenKind::Out => "'out'",
            TokenKind::Print => "'print'",
            TokenKind::Assign => "'='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Arrow => "'->'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Ident => "identifier",
            TokenKind::Real => "real literal",
            TokenKind::Int => "integer literal",
            TokenKind::Str => "string literal",
            TokenKind::Eof => "end of input",
        }
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Caret
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched source text, verbatim.
    pub text: String,
    pub pos: Pos,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Ident | TokenKind::Real | TokenKind::Int | TokenKind::Str => {
                write!(f, "{} {}", self.kind.describe(), self.text)
            }
            _ => f.write_str(self.kind.describe()),
        }
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

struct Rule {
    /// `None` marks an ignored rule (whitespace).
    kind: Option<TokenKind>,
    re: Regex,
}

const RULES: &[(Option<TokenKind>, &str)] = &[
    (Some(TokenKind::Var), r"var\b"),
    (Some(TokenKind::Out), r"out\b"),
    (Some(TokenKind::Print), r"print\b"),
    (Some(TokenKind::Assign), r"="),
    (Some(TokenKind::LParen), r"\("),
    (Some(TokenKind::RParen), r"\)"),
    (Some(TokenKind::LBrace), r"\{"),
    (Some(TokenKind::RBrace), r"\}"),
    (Some(TokenKind::Comma), r","),
    (Some(TokenKind::Arrow), r"->"),
    (Some(TokenKind::Plus), r"\+"),
    (Some(TokenKind::Minus), r"-"),
    (Some(TokenKind::Star), r"\*"),
    (Some(TokenKind::Slash), r"/"),
    (Some(TokenKind::Caret), r"\^"),
    (None, r"\s+"),
    (Some(TokenKind::Ident), r"[A-Za-z_]\w*"),
    (Some(TokenKind::Real), r"\d[\d_]*\.[\d_]*"),
    (Some(TokenKind::Int), r"\d[\d_]*"),
    (Some(TokenKind::Str), r#""[^"]*""#),
];

fn rules() -> &'static [Rule] {
    static RULE_TABLE: OnceLock<Vec<Rule>> = OnceLock::new();
    RULE_TABLE.get_or_init(|| {
        RULES
            .iter()
            .map(|&(kind, src)| Rule {
                kind,
                re: Regex::new(&format!(r"\A(?:{src})")).expect("token rules are valid regexes"),
            })
            .collect()
    })
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

/// Split `src` into tokens, terminated by a single [`TokenKind::Eof`].
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    let mut pos = Pos::new(1, 1);

    'scan: while offset < src.len() {
        let rest = &src[offset..];
        for rule in rules() {
            let Some(m) = rule.re.find(rest) else { continue };
            if m.is_empty() {
                continue;
            }
            let text = m.as_str();
            if let Some(kind) = rule.kind {
                tokens.push(Token {
                    kind,
                    text: text.to_owned(),
                    pos,
                });
            }
            pos = advance(pos, text);
            offset += m.end();
            continue 'scan;
        }
        let ch = rest.chars().next().unwrap_or('\0');
        return Err(LexError { ch, pos });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        pos,
    });
    Ok(tokens)
}

fn advance(mut pos: Pos, text: &str) -> Pos {
    for ch in text.chars() {
        if ch == '\n' {
            pos.line += 1;
            pos.col = 1;
        } else {
            pos.col += 1;
        }
    }
    pos
}

// ── Tests ─────────────────────────────────────────────────────────────────────
