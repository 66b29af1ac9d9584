//! Command tokens accepted by the calculator engine.
//!
//! Tokens use the keypad spellings: digits, `.`, the four operators, `%`,
//! `=`, `C`, `CE` and the memory keys `MC`, `M+`, `M-`, `MR`.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    /// One keypad token at the start of a line. Multi-character keys are
    /// listed before `C` so that `CE` and `MC` win over a bare `C`.
    static ref KEYPAD_TOKEN: Regex = Regex::new(
        r"^(?i:MC|M\+|M-|MR|CE|C)|^[0-9.+\-*/%=]"
    ).unwrap();
}

/// A binary operator key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The symbol written into the expression line.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }
}

/// A single keypad command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A digit `0`-`9` or the decimal point. The engine ignores any other
    /// character.
    Digit(char),
    Operator(Operator),
    Percent,
    Equals,
    /// `C`
    ClearAll,
    /// `CE`
    ClearEntry,
    /// `MC`
    MemoryClear,
    /// `M+`
    MemoryAdd,
    /// `M-`
    MemorySubtract,
    /// `MR`
    MemoryRecall,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown calculator command: {0:?}")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s {
            "%" => Self::Percent,
            "=" => Self::Equals,
            "C" => Self::ClearAll,
            "CE" => Self::ClearEntry,
            "MC" => Self::MemoryClear,
            "M+" => Self::MemoryAdd,
            "M-" => Self::MemorySubtract,
            "MR" => Self::MemoryRecall,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || c == '.' => Self::Digit(c),
                    (Some(c), None) => match Operator::from_symbol(c) {
                        Some(op) => Self::Operator(op),
                        None => return Err(ParseCommandError(s.to_string())),
                    },
                    _ => return Err(ParseCommandError(s.to_string())),
                }
            }
        };
        Ok(command)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Digit(c) => write!(f, "{c}"),
            Self::Operator(op) => write!(f, "{}", op.symbol()),
            Self::Percent => f.write_str("%"),
            Self::Equals => f.write_str("="),
            Self::ClearAll => f.write_str("C"),
            Self::ClearEntry => f.write_str("CE"),
            Self::MemoryClear => f.write_str("MC"),
            Self::MemoryAdd => f.write_str("M+"),
            Self::MemorySubtract => f.write_str("M-"),
            Self::MemoryRecall => f.write_str("MR"),
        }
    }
}

impl Command {
    /// Map a key name to a command, following the desktop key bindings:
    /// `Enter` evaluates, `Backspace` clears the entry, `Escape` clears all,
    /// and printable keys map to their own token.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" | "Return" => Some(Self::Equals),
            "Backspace" => Some(Self::ClearEntry),
            "Escape" | "Esc" => Some(Self::ClearAll),
            "C" | "CE" | "MC" | "M+" | "M-" | "MR" => key.parse().ok(),
            other if other.chars().count() == 1 => other.parse().ok(),
            _ => None,
        }
    }
}

/// Split a typed line into keypad commands.
///
/// Whitespace is ignored and letters are case-insensitive, so `12+3=`,
/// `1 2 + 3 =` and `mc 5 m+` all work. The whole line is rejected if any
/// fragment is not a keypad token.
pub fn parse_commands(line: &str) -> Result<Vec<Command>, ParseCommandError> {
    let mut commands = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        let Some(m) = KEYPAD_TOKEN.find(rest) else {
            let fragment: String = rest.split_whitespace().next().unwrap_or(rest).to_string();
            return Err(ParseCommandError(fragment));
        };

        commands.push(m.as_str().to_ascii_uppercase().parse()?);
        rest = rest[m.end()..].trim_start();
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tokens() {
        assert_eq!("7".parse::<Command>(), Ok(Command::Digit('7')));
        assert_eq!(".".parse::<Command>(), Ok(Command::Digit('.')));
        assert_eq!("/".parse::<Command>(), Ok(Command::Operator(Operator::Divide)));
        assert_eq!("%".parse::<Command>(), Ok(Command::Percent));
        assert_eq!("=".parse::<Command>(), Ok(Command::Equals));
        assert_eq!("C".parse::<Command>(), Ok(Command::ClearAll));
        assert_eq!("CE".parse::<Command>(), Ok(Command::ClearEntry));
        assert_eq!("MC".parse::<Command>(), Ok(Command::MemoryClear));
        assert_eq!("M+".parse::<Command>(), Ok(Command::MemoryAdd));
        assert_eq!("M-".parse::<Command>(), Ok(Command::MemorySubtract));
        assert_eq!("MR".parse::<Command>(), Ok(Command::MemoryRecall));
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        assert!("".parse::<Command>().is_err());
        assert!("12".parse::<Command>().is_err());
        assert!("^".parse::<Command>().is_err());
        assert!("M*".parse::<Command>().is_err());
        assert_eq!(
            "sqrt".parse::<Command>(),
            Err(ParseCommandError("sqrt".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_token_spelling() {
        for token in ["5", ".", "+", "-", "*", "/", "%", "=", "C", "CE", "MC", "M+", "M-", "MR"] {
            let command: Command = token.parse().unwrap();
            assert_eq!(command.to_string(), token);
        }
    }

    #[test]
    fn test_parse_compact_line() {
        let commands = parse_commands("12+3=").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Digit('1'),
                Command::Digit('2'),
                Command::Operator(Operator::Add),
                Command::Digit('3'),
                Command::Equals,
            ]
        );
    }

    #[test]
    fn test_parse_prefers_longest_key() {
        let commands = parse_commands("ce c mc m+ m- mr").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::ClearEntry,
                Command::ClearAll,
                Command::MemoryClear,
                Command::MemoryAdd,
                Command::MemorySubtract,
                Command::MemoryRecall,
            ]
        );
    }

    #[test]
    fn test_parse_memory_minus_is_not_subtraction() {
        // `M-` binds before a plain `-`
        let commands = parse_commands("4 M-").unwrap();
        assert_eq!(commands, vec![Command::Digit('4'), Command::MemorySubtract]);
    }

    #[test]
    fn test_parse_rejects_unknown_fragment() {
        assert_eq!(
            parse_commands("3 + foo"),
            Err(ParseCommandError("foo".to_string()))
        );
        assert_eq!(parse_commands("   "), Ok(Vec::new()));
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key("Enter"), Some(Command::Equals));
        assert_eq!(Command::from_key("Backspace"), Some(Command::ClearEntry));
        assert_eq!(Command::from_key("Escape"), Some(Command::ClearAll));
        assert_eq!(Command::from_key("9"), Some(Command::Digit('9')));
        assert_eq!(Command::from_key("*"), Some(Command::Operator(Operator::Multiply)));
        assert_eq!(Command::from_key("M+"), Some(Command::MemoryAdd));
        assert_eq!(Command::from_key("F1"), None);
        assert_eq!(Command::from_key("x"), None);
    }
}
