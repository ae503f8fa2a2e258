//! Print-argument expressions.
//!
//! Grammar:
//!
//! ```text
//! args := ε | expr (',' expr)*
//! expr := term ('+' term)*
//! term := STRING | INTEGER | IDENT
//! ```
//!
//! Strings use `'` or `"` with backslash escapes. `+` adds two integers and
//! concatenates anything else, left to right.

use std::fmt;

/// Lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Str(String),
    /// Integer literal; digits kept verbatim when they overflow `i64`.
    Int(Value),
    Ident(String),
    Plus,
    Comma,
}

/// Evaluated term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Apply `+` to two values.
    fn plus(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => match a.checked_add(b) {
                Some(sum) => Self::Int(sum),
                None => Self::Text(format!("{a}{b}")),
            },
            (lhs, rhs) => Self::Text(format!("{lhs}{rhs}")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Tokenizer failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,
    /// Character outside the grammar; the expression is not evaluable.
    #[error("unsupported character '{0}'")]
    Unsupported(char),
}

/// A `+` chain of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expr(Vec<Term>);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Literal(Value),
    Ident(String),
}

/// Split an argument list into tokens.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '+' => tokens.push(Token::Plus),
            ',' => tokens.push(Token::Comma),
            '"' | '\'' => tokens.push(Token::Str(read_string(&mut chars, c)?)),
            c if c.is_ascii_digit() => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, d)) = chars.peek()
                    && d.is_ascii_digit()
                {
                    end = i + d.len_utf8();
                    chars.next();
                }
                let digits = &src[start..end];
                let value = digits
                    .parse()
                    .map_or_else(|_| Value::Text(digits.to_owned()), Value::Int);
                tokens.push(Token::Int(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, d)) = chars.peek()
                    && (d.is_alphanumeric() || d == '_')
                {
                    end = i + d.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Ident(src[start..end].to_owned()));
            }
            other => return Err(LexError::Unsupported(other)),
        }
    }

    Ok(tokens)
}

/// Read a string literal body after its opening quote.
fn read_string(
    chars: &mut impl Iterator<Item = (usize, char)>,
    quote: char,
) -> Result<String, LexError> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(text),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, e @ ('\\' | '\'' | '"'))) => text.push(e),
                Some((_, other)) => {
                    text.push('\\');
                    text.push(other);
                }
                None => break,
            },
            c => text.push(c),
        }
    }
    Err(LexError::UnterminatedString)
}

/// Parse tokens as a comma-separated argument list.
///
/// Returns `None` when the tokens do not fit the grammar.
pub(crate) fn parse_args(tokens: Vec<Token>) -> Option<Vec<Expr>> {
    let mut args = Vec::new();
    let mut terms = Vec::new();
    // Alternates: a term is expected, then an operator
    let mut expect_term = true;

    for token in tokens {
        match (expect_term, token) {
            (true, Token::Str(s)) => terms.push(Term::Literal(Value::Text(s))),
            (true, Token::Int(v)) => terms.push(Term::Literal(v)),
            (true, Token::Ident(name)) => terms.push(Term::Ident(name)),
            (false, Token::Plus) => {}
            (false, Token::Comma) => args.push(Expr(std::mem::take(&mut terms))),
            _ => return None,
        }
        expect_term = !expect_term;
    }

    match (expect_term, terms.is_empty(), args.is_empty()) {
        // Empty argument list
        (true, true, true) => Some(args),
        // Trailing operator
        (true, _, _) => None,
        (false, _, _) => {
            args.push(Expr(terms));
            Some(args)
        }
    }
}

impl Expr {
    /// Evaluate left to right, resolving identifiers with `resolve`.
    ///
    /// Unresolved identifiers evaluate to their own name.
    pub(crate) fn eval(&self, resolve: &impl Fn(&str) -> Option<Value>) -> Value {
        let mut values = self.0.iter().map(|term| match term {
            Term::Literal(value) => value.clone(),
            Term::Ident(name) => resolve(name).unwrap_or_else(|| Value::Text(name.clone())),
        });
        let first = values.next().unwrap_or_else(|| Value::Text(String::new()));
        values.fold(first, Value::plus)
    }
}

/// Parse a single literal as it appears on the right of an assignment.
pub(crate) fn parse_literal(src: &str) -> Option<Value> {
    let src = src.trim();
    if let Some(rest) = src.strip_prefix('-') {
        return rest.parse::<i64>().ok().map(|n| Value::Int(-n));
    }
    match tokenize(src).ok()?.as_slice() {
        [Token::Str(s)] => Some(Value::Text(s.clone())),
        [Token::Int(v)] => Some(v.clone()),
        _ => None,
    }
}
