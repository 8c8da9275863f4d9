//! Recursive-descent parser producing the expression tree.
//!
//! Precedence, lowest first:
//!
//! ```text
//! or      := and ( "||" and )*
//! and     := compare ( "&&" compare )*
//! compare := unary ( ( "==" | "!=" | "<" | "<=" | ">" | ">=" | "=~" | "!~" ) unary )*
//! unary   := ( "!" | "-" ) unary | postfix
//! postfix := primary ( "." ident "(" args ")" )*
//! primary := number | string | "true" | "false" | ident [ "(" args ")" ] | "(" or ")"
//! ```
//!
//! Function names are resolved against the registry while parsing, so an
//! unknown function or a wrong argument count is a compile error. Nesting
//! through parentheses, arguments and prefix operators stops at
//! [`MAX_DEPTH`] levels.

use std::fmt;

use regex::Regex;
use tabloid::Value;

use crate::error::{ExprError, Result};
use crate::functions::{Function, FunctionRegistry};
use crate::lexer::{Spanned, Token};

/// Deepest nesting the parser accepts.
pub(crate) const MAX_DEPTH: usize = 64;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Right-hand side of a regex match.
#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    /// Literal pattern, compiled once.
    Compiled(Regex),
    /// Pattern computed per row.
    Dynamic(Box<Expr>),
}

/// Expression tree.
#[derive(Debug, Clone)]
pub(crate) enum Expr {
    Literal(Value),
    /// Column reference; `lowered` is tried when `name` is not a column.
    Ident { name: String, lowered: String },
    Not(Box<Expr>),
    Neg(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Match {
        lhs: Box<Expr>,
        pattern: Pattern,
        negated: bool,
    },
    Call { function: Function, args: Vec<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::Ident { name, .. } => f.write_str(name),
            Expr::Not(e) => write!(f, "!{e}"),
            Expr::Neg(e) => write!(f, "-{e}"),
            Expr::And(l, r) => write!(f, "({l} && {r})"),
            Expr::Or(l, r) => write!(f, "({l} || {r})"),
            Expr::Compare { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.as_str()),
            Expr::Match {
                lhs,
                pattern,
                negated,
            } => {
                let op = if *negated { "!~" } else { "=~" };
                match pattern {
                    Pattern::Compiled(re) => write!(f, "({lhs} {op} {:?})", re.as_str()),
                    Pattern::Dynamic(e) => write!(f, "({lhs} {op} {e})"),
                }
            }
            Expr::Call { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Parses a token stream into an expression tree.
pub(crate) fn parse(tokens: &[Spanned], registry: &FunctionRegistry) -> Result<Expr> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        registry,
    };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(spanned) => Err(parser.unexpected(spanned, "end of expression")),
    }
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    registry: &'a FunctionRegistry,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    /// Consumes the next token if it equals `token`.
    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|s| &s.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<()> {
        match self.advance() {
            Some(spanned) if &spanned.token == token => Ok(()),
            Some(spanned) => Err(self.unexpected(spanned, expected)),
            None => Err(ExprError::UnexpectedEnd { expected }),
        }
    }

    fn unexpected(&self, spanned: &Spanned, expected: &'static str) -> ExprError {
        ExprError::UnexpectedToken {
            found: spanned.token.to_string(),
            offset: spanned.offset,
            expected,
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::OrOr) {
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_compare()?;
        while self.eat(&Token::AndAnd) {
            let rhs = self.parse_compare()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_compare(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|s| &s.token) {
                Some(Token::EqEq) => CompareOp::Eq,
                Some(Token::NotEq) => CompareOp::Ne,
                Some(Token::Lt) => CompareOp::Lt,
                Some(Token::Le) => CompareOp::Le,
                Some(Token::Gt) => CompareOp::Gt,
                Some(Token::Ge) => CompareOp::Ge,
                Some(Token::Match) | Some(Token::NotMatch) => {
                    let negated = self.peek().map(|s| &s.token) == Some(&Token::NotMatch);
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    let pattern = match rhs {
                        Expr::Literal(Value::String(ref source)) => {
                            Pattern::Compiled(Regex::new(source)?)
                        }
                        other => Pattern::Dynamic(Box::new(other)),
                    };
                    lhs = Expr::Match {
                        lhs: Box::new(lhs),
                        pattern,
                        negated,
                    };
                    continue;
                }
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Compare {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    /// Every recursive production passes through here.
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let expr = self.parse_prefix();
        self.depth -= 1;
        expr
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        if self.eat(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.parse_unary()?)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&Token::Dot) {
            let name = match self.advance() {
                Some(Spanned {
                    token: Token::Ident(name),
                    ..
                }) => name,
                Some(spanned) => return Err(self.unexpected(spanned, "method name")),
                None => {
                    return Err(ExprError::UnexpectedEnd {
                        expected: "method name",
                    })
                }
            };
            self.expect(&Token::LParen, "'('")?;
            let mut args = vec![expr];
            args.extend(self.parse_args()?);
            expr = self.call(name, args)?;
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let spanned = self.advance().ok_or(ExprError::UnexpectedEnd {
            expected: "a value",
        })?;

        match &spanned.token {
            Token::Number(n) => Ok(Expr::Literal(Value::Number(*n))),
            Token::Str(s) => Ok(Expr::Literal(Value::String(s.clone()))),
            Token::Ident(name) if name == "true" => Ok(Expr::Literal(Value::Bool(true))),
            Token::Ident(name) if name == "false" => Ok(Expr::Literal(Value::Bool(false))),
            Token::Ident(name) => {
                if self.eat(&Token::LParen) {
                    let args = self.parse_args()?;
                    self.call(name, args)
                } else {
                    Ok(Expr::Ident {
                        name: name.clone(),
                        lowered: name.to_lowercase(),
                    })
                }
            }
            Token::LParen => {
                let expr = self.parse_or()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.unexpected(spanned, "a value")),
        }
    }

    /// Parses arguments after an opening parenthesis, up to the closing one.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            self.expect(&Token::Comma, "',' or ')'")?;
        }
    }

    fn call(&self, name: &str, args: Vec<Expr>) -> Result<Expr> {
        let function = self
            .registry
            .get(name)
            .ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;
        if function.arity() != args.len() {
            return Err(ExprError::Arity {
                name: function.name().to_string(),
                expected: function.arity(),
                found: args.len(),
            });
        }
        Ok(Expr::Call {
            function: function.clone(),
            args,
        })
    }
}
