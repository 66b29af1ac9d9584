use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use zcalc::repl::{self, Session};
use zcalc::{Calculator, Config, logging};

/// A standard calculator with memory and history.
///
/// Type keypad tokens (`12 + 3 =`, `CE`, `M+`, ...) one line at a time,
/// or pass them as arguments to evaluate once.
#[derive(Parser, Debug)]
#[command(name = "zcalc", version, about)]
struct Cli {
    /// Config file (default: ~/.config/zcalc/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum fractional digits to show
    #[arg(short, long)]
    precision: Option<usize>,

    /// Print display updates as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Keypad tokens to run instead of reading stdin
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init(&config.log.filter, cli.verbose);

    let precision = cli.precision.unwrap_or(config.precision);
    let json = cli.json || config.json;
    tracing::debug!(precision, json, "starting");

    let mut session = Session::new(Calculator::with_precision(precision), json);
    let mut stdout = std::io::stdout().lock();

    if !cli.tokens.is_empty() {
        session.handle_line(&cli.tokens.join(" "), &mut stdout)?;
        return Ok(());
    }

    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal().then_some(config.prompt.as_str());
    repl::run(&mut session, stdin.lock(), &mut stdout, prompt)
}
