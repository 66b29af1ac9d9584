//! Line-oriented terminal front-end.
//!
//! Each input line is a run of keypad tokens (`12 + 3 =`) or one of the
//! meta commands below. After every keypad line the display is printed.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::calculator::{Calculator, format_number, parse_commands};

const HELP: &str = "\
keys:  0-9 .  + - * /  %  =  C  CE  MC M+ M- MR
meta:  :history  :clear-history  :memory  :help  :quit";

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A calculator plus the output options of the terminal session.
#[derive(Debug)]
pub struct Session {
    calculator: Calculator,
    json: bool,
}

impl Session {
    pub fn new(calculator: Calculator, json: bool) -> Self {
        Self { calculator, json }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Handle one line of input, writing any output to `out`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        if let Some(meta) = line.strip_prefix(':') {
            return self.handle_meta(meta.trim(), out);
        }

        let commands = match parse_commands(line) {
            Ok(commands) => commands,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                return Ok(Flow::Continue);
            }
        };

        let mut display = self.calculator.display();
        for command in commands {
            display = self.calculator.process(command);
        }

        if self.json {
            writeln!(out, "{}", serde_json::to_string(&display)?)?;
        } else {
            writeln!(out, "{display}")?;
        }
        Ok(Flow::Continue)
    }

    fn handle_meta<W: Write>(&mut self, meta: &str, out: &mut W) -> Result<Flow> {
        debug!(command = meta, "meta command");
        match meta {
            "history" | "h" => {
                if self.json {
                    let entries: Vec<_> = self.calculator.history().newest_first().collect();
                    writeln!(out, "{}", serde_json::to_string(&entries)?)?;
                } else if self.calculator.history().is_empty() {
                    writeln!(out, "(no history)")?;
                } else {
                    for entry in self.calculator.history().newest_first() {
                        writeln!(out, "{entry}")?;
                    }
                }
            }
            "clear-history" => {
                self.calculator.clear_history();
                writeln!(out, "history cleared")?;
            }
            "memory" | "m" => {
                let text = format_number(self.calculator.memory(), self.calculator.precision());
                writeln!(out, "M = {text}")?;
            }
            "help" | "?" => writeln!(out, "{HELP}")?,
            "quit" | "q" | "exit" => return Ok(Flow::Quit),
            other => writeln!(out, "error: unknown meta command :{other} (try :help)")?,
        }
        Ok(Flow::Continue)
    }
}

/// Read lines from `input` until EOF or `:quit`.
///
/// `prompt` is written before each line when given.
pub fn run<R, W>(session: &mut Session, input: R, out: &mut W, prompt: Option<&str>) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        if let Some(prompt) = prompt {
            write!(out, "{prompt}")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };

        if session.handle_line(&line?, out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str, json: bool) -> String {
        let mut session = Session::new(Calculator::new(), json);
        let mut out = Vec::new();
        run(&mut session, script.as_bytes(), &mut out, None).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_display_after_each_line() {
        let output = run_script("3 +\n4\n=\n", false);
        assert_eq!(output, "3 + \n0\n3 + \n4\n7\n");
    }

    #[test]
    fn test_compact_line() {
        assert_eq!(run_script("12*3=", false), "36\n");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(run_script("5/0=", false), "Error\n");
    }

    #[test]
    fn test_unknown_token_leaves_state() {
        let output = run_script("4 + 2\n4 x 2\n=\n", false);
        assert_eq!(
            output,
            "4 + \n2\nerror: unknown calculator command: \"x\"\n6\n"
        );
    }

    #[test]
    fn test_history_newest_first() {
        let output = run_script("1+1=\n2*3=\n:history\n", false);
        assert_eq!(output, "2\n6\n2 * 3 = 6\n1 + 1 = 2\n");
    }

    #[test]
    fn test_clear_history() {
        let output = run_script("1+1=\n:clear-history\n:history\n", false);
        assert_eq!(output, "2\nhistory cleared\n(no history)\n");
    }

    #[test]
    fn test_memory_meta() {
        let output = run_script("7 M+ C\n:memory\n", false);
        assert_eq!(output, "0\nM = 7\n");
    }

    #[test]
    fn test_quit_stops_reading() {
        let output = run_script("1\n:quit\n2\n", false);
        assert_eq!(output, "1\n");
    }

    #[test]
    fn test_json_output() {
        let output = run_script("3+\n", true);
        assert_eq!(
            output,
            "{\"expression\":\"3 + \",\"primary\":\"0\",\"is_error\":false}\n"
        );

        let output = run_script("2+2=\n:history\n", true);
        assert_eq!(
            output,
            "{\"expression\":\"\",\"primary\":\"4\",\"is_error\":false}\n\
             [{\"expression\":\"2 + 2\",\"result\":\"4\"}]\n"
        );
    }

    #[test]
    fn test_prompt() {
        let mut session = Session::new(Calculator::new(), false);
        let mut out = Vec::new();
        run(&mut session, "9\n".as_bytes(), &mut out, Some("> ")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> 9\n> ");
    }
}
