//! zcalc: a standard keypad calculator engine.
//!
//! The [`calculator`] module holds the engine; [`repl`] drives it from a
//! terminal.

pub mod calculator;
pub mod config;
pub mod logging;
pub mod repl;

pub use calculator::{Calculator, Command, Display, Outcome};
pub use config::Config;
