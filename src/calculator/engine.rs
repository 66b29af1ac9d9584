//! The calculator input state machine.
//!
//! [`Calculator`] consumes one [`Command`] at a time and keeps the digits
//! being typed, the pending expression, the last result, a memory register
//! and the history log. Every command returns the resulting [`Display`].

use tracing::{debug, warn};

use super::command::{Command, Operator, ParseCommandError};
use super::display::Display;
use super::evaluation::{encode_number, evaluate_expression, format_number};
use super::history::History;

/// Fractional digits shown when no precision is configured.
pub const DEFAULT_PRECISION: usize = 10;

/// The outcome of the last `=`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Value(f64),
    /// The expression could not be evaluated.
    Error,
}

#[derive(Clone, Debug)]
pub struct Calculator {
    input: String,
    expression: String,
    result: Option<Outcome>,
    memory: f64,
    history: History,
    precision: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }
}

impl Calculator {
    /// Create a calculator with the default precision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator that shows at most `precision` fractional digits.
    pub fn with_precision(precision: usize) -> Self {
        Self {
            input: String::new(),
            expression: String::new(),
            result: None,
            memory: 0.0,
            history: History::new(),
            precision,
        }
    }

    /// Apply a keypad token such as `"7"`, `"+"` or `"M+"`.
    pub fn process_token(&mut self, token: &str) -> Result<Display, ParseCommandError> {
        let command = token.parse()?;
        Ok(self.process(command))
    }

    /// Apply one command and return what should be shown.
    pub fn process(&mut self, command: Command) -> Display {
        debug!(%command, "processing command");

        match command {
            Command::Digit(c) => self.push_digit(c),
            Command::Operator(op) => self.push_operator(op),
            Command::Percent => self.percent(),
            Command::Equals => self.equals(),
            Command::ClearAll => self.clear_all(),
            Command::ClearEntry => self.clear_entry(),
            Command::MemoryClear
            | Command::MemoryAdd
            | Command::MemorySubtract
            | Command::MemoryRecall => self.memory_key(command),
        }

        self.display()
    }

    /// The current display lines.
    pub fn display(&self) -> Display {
        match self.result {
            Some(Outcome::Value(value)) => {
                Display::value(self.expression.clone(), self.format(value))
            }
            Some(Outcome::Error) => Display::error(self.expression.clone()),
            None => Display::value(self.expression.clone(), self.input.clone()),
        }
    }

    /// The digits currently being typed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The pending expression, operands and operators separated by spaces.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The last evaluation outcome, if it is still shown.
    pub fn result(&self) -> Option<Outcome> {
        self.result
    }

    /// The memory register.
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// Completed evaluations.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Empty the history log. Buffers, result and memory are untouched.
    pub fn clear_history(&mut self) {
        debug!(entries = self.history.len(), "clearing history");
        self.history.clear();
    }

    /// Maximum fractional digits shown for results.
    pub fn precision(&self) -> usize {
        self.precision
    }

    fn format(&self, value: f64) -> String {
        format_number(value, self.precision)
    }

    fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() && c != '.' {
            debug!(digit = %c, "ignoring non-digit");
            return;
        }
        if self.result.is_some() {
            self.input.clear();
            self.result = None;
        }
        if c == '.' && self.input.contains('.') {
            return;
        }
        self.input.push(c);
    }

    fn push_operator(&mut self, op: Operator) {
        let symbol = op.symbol();
        if !self.input.is_empty() {
            self.expression.push_str(&format!("{} {} ", self.input, symbol));
        } else if let Some(Outcome::Value(value)) = self.result {
            self.expression = format!("{} {} ", encode_number(value), symbol);
        } else if self.result.is_none() {
            return;
        }
        self.input.clear();
        self.result = None;
    }

    fn equals(&mut self) {
        if self.input.is_empty() && self.expression.is_empty() {
            return;
        }

        let full = format!("{}{}", self.expression, self.input)
            .trim()
            .to_string();

        match evaluate_expression(&full) {
            Ok(value) => {
                let text = self.format(value);
                debug!(expression = %full, result = %text, "evaluated");
                self.history.push(full, text);
                self.result = Some(Outcome::Value(value));
            }
            Err(error) => {
                warn!(expression = %full, %error, "evaluation failed");
                self.result = Some(Outcome::Error);
            }
        }

        self.expression.clear();
        self.input.clear();
    }

    fn percent(&mut self) {
        if self.input.is_empty() {
            return;
        }
        match self.input.parse::<f64>() {
            Ok(value) => self.input = encode_number(value / 100.0),
            Err(_) => debug!(input = %self.input, "ignoring percent on malformed input"),
        }
    }

    fn clear_all(&mut self) {
        self.input.clear();
        self.expression.clear();
        self.result = None;
    }

    fn clear_entry(&mut self) {
        if !self.input.is_empty() {
            self.input.pop();
        } else if self.result.is_some() {
            self.clear_all();
        }
    }

    /// The value the memory keys act on: the input if any, else the last
    /// result. `None` when there is neither or it does not parse.
    fn memory_operand(&self) -> Option<f64> {
        if !self.input.is_empty() {
            return self.input.parse().ok();
        }
        match self.result {
            Some(Outcome::Value(value)) => Some(value),
            Some(Outcome::Error) | None => None,
        }
    }

    fn memory_key(&mut self, command: Command) {
        let Some(operand) = self.memory_operand() else {
            debug!(%command, "ignoring memory key without a usable operand");
            return;
        };

        let memory = match command {
            Command::MemoryClear => 0.0,
            Command::MemoryAdd => self.memory + operand,
            Command::MemorySubtract => self.memory - operand,
            Command::MemoryRecall => {
                self.input = encode_number(self.memory);
                self.result = None;
                return;
            }
            _ => return,
        };

        if !memory.is_finite() {
            debug!(%command, "ignoring memory update that overflows");
            return;
        }
        self.memory = memory;
    }
}
