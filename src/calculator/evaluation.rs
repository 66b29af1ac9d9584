//! Arithmetic expression evaluation.
//!
//! A small recursive-descent evaluator for the expressions the keypad can
//! build: decimal literals joined by `+ - * /`, with unary signs so that
//! negative results and recalled memory can be fed back in as text.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// A run of digits and decimal points. Validity is checked by `f64::from_str`.
    static ref NUMBER: Regex = Regex::new(r"^[0-9.]+").unwrap();
}

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("unrecognized character: {0:?}")]
    UnrecognizedToken(char),
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("division by zero")]
    DivideByZero,
    #[error("result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if let Some(m) = NUMBER.find(rest) {
            let literal = m.as_str();
            let value = literal
                .parse::<f64>()
                .map_err(|_| EvalError::InvalidNumber(literal.to_string()))?;
            tokens.push(Token::Number(value));
            rest = &rest[m.end()..];
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            other => return Err(EvalError::UnrecognizedToken(other)),
        };
        tokens.push(token);
        rest = &rest[c.len_utf8()..];
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse the whole token stream; trailing tokens are an error.
    fn parse(mut self) -> Result<f64, EvalError> {
        let value = self.expr()?;
        match self.next() {
            None => Ok(value),
            Some(token) => Err(EvalError::UnexpectedToken(token.to_string())),
        }
    }

    // Addition and subtraction
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // Multiplication and division
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivideByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.next() {
            Some(Token::Minus) => Ok(-self.unary()?),
            Some(Token::Plus) => self.unary(),
            Some(Token::Number(n)) => Ok(n),
            Some(token) => Err(EvalError::UnexpectedToken(token.to_string())),
            None => Err(EvalError::UnexpectedEndOfInput),
        }
    }
}

/// Evaluate an infix arithmetic expression.
///
/// Supports decimal literals, `+ - * /` with the usual precedence (left
/// associative) and unary `+`/`-`. Division by zero and any non-finite
/// result are reported as errors rather than returned as infinities.
pub fn evaluate_expression(input: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let value = Parser::new(tokens).parse()?;
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

/// Write a number back as an operand without losing precision.
///
/// f64's `Display` is the shortest text that parses back to the same value
/// and never uses exponent notation, so the tokenizer reads it exactly.
pub fn encode_number(value: f64) -> String {
    if value == 0.0 {
        // folds -0
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Format a number for display.
///
/// Whole numbers are printed without a fractional part; everything else is
/// printed with at most `precision` fractional digits, trailing zeros removed.
pub fn format_number(value: f64, precision: usize) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        // `as i64` also folds -0.0 into 0
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.*}", precision, value);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };
        match trimmed {
            "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }
}
