//! Calculator module.
//!
//! This module provides:
//! - Keypad command tokens and line parsing
//! - The input state machine with memory and history
//! - A small arithmetic evaluator for the expressions the keypad builds

mod command;
mod display;
mod engine;
mod evaluation;
mod history;

pub use command::{Command, Operator, ParseCommandError, parse_commands};
pub use display::{Display, ERROR_TEXT};
pub use engine::{Calculator, DEFAULT_PRECISION, Outcome};
pub use evaluation::{EvalError, encode_number, evaluate_expression, format_number};
pub use history::{History, HistoryEntry};
