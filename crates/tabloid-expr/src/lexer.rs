//! Tokenizer for filter expressions.

use std::fmt;

use crate::error::{ExprError, Result};

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
    Dot,
    Not,
    Minus,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Match,
    NotMatch,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier {name:?}"),
            Token::Str(s) => write!(f, "string {s:?}"),
            Token::Number(n) => write!(f, "number {n}"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Dot => f.write_str("'.'"),
            Token::Not => f.write_str("'!'"),
            Token::Minus => f.write_str("'-'"),
            Token::AndAnd => f.write_str("'&&'"),
            Token::OrOr => f.write_str("'||'"),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Lt => f.write_str("'<'"),
            Token::Le => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::Ge => f.write_str("'>='"),
            Token::Match => f.write_str("'=~'"),
            Token::NotMatch => f.write_str("'!~'"),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Splits an expression into tokens.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = if c == '"' || c == '\'' {
            chars.next();
            lex_string(&mut chars, c, offset)?
        } else if c.is_ascii_digit() {
            let mut end = offset;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() {
                    end = i + 1;
                    chars.next();
                } else {
                    break;
                }
            }

            // Keys such as `5xx_errors` start with digits.
            if matches!(chars.peek(), Some(&(_, d)) if d.is_alphabetic() || d == '_') {
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned {
                    token: Token::Ident(input[offset..end].to_string()),
                    offset,
                });
                continue;
            }

            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    end = i + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &input[offset..end];
            let number = text.parse().map_err(|_| ExprError::InvalidNumber {
                text: text.to_string(),
                offset,
            })?;
            Token::Number(number)
        } else if c.is_alphabetic() || c == '_' {
            let mut end = offset;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_alphanumeric() || d == '_' {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            Token::Ident(input[offset..end].to_string())
        } else {
            chars.next();
            let next = chars.peek().map(|&(_, n)| n);
            let (token, pair) = match (c, next) {
                ('&', Some('&')) => (Token::AndAnd, true),
                ('|', Some('|')) => (Token::OrOr, true),
                ('=', Some('=')) => (Token::EqEq, true),
                ('=', Some('~')) => (Token::Match, true),
                ('!', Some('=')) => (Token::NotEq, true),
                ('!', Some('~')) => (Token::NotMatch, true),
                ('<', Some('=')) => (Token::Le, true),
                ('>', Some('=')) => (Token::Ge, true),
                ('!', _) => (Token::Not, false),
                ('<', _) => (Token::Lt, false),
                ('>', _) => (Token::Gt, false),
                ('-', _) => (Token::Minus, false),
                ('(', _) => (Token::LParen, false),
                (')', _) => (Token::RParen, false),
                (',', _) => (Token::Comma, false),
                ('.', _) => (Token::Dot, false),
                _ => return Err(ExprError::UnexpectedChar { ch: c, offset }),
            };
            if pair {
                chars.next();
            }
            token
        };

        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

fn lex_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    offset: usize,
) -> Result<Token> {
    let mut value = String::new();
    loop {
        match chars.next() {
            None => return Err(ExprError::UnterminatedString { offset }),
            Some((_, c)) if c == quote => return Ok(Token::Str(value)),
            Some((_, '\\')) => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, escaped)) => value.push(escaped),
                None => return Err(ExprError::UnterminatedString { offset }),
            },
            Some((_, c)) => value.push(c),
        }
    }
}
