//! # Felt CLI Library
//!
//! Command-line host for the Felt poker engine: deal single hands, rank
//! cards, estimate equity, and run all-CPU tables through the timer runtime.
//!
//! The entry point is [`run`], which parses arguments and dispatches to one
//! of the handlers in [`commands`]:
//!
//! - `deal`: deal one hand and show every seat's cards and the board
//! - `eval`: rank 5 to 7 cards, or estimate equity for 2 hole cards
//! - `sim`: play N hands at an all-CPU table, optionally writing JSONL history
//! - `cfg`: show the resolved configuration and each value's source
//!
//! ```
//! use std::io;
//! let args = vec!["felt", "eval", "Ah", "Kh", "Qh", "Jh", "Th"];
//! let code = felt_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod ui;

use cli::{Commands, FeltCli};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command};
pub use error::CliError;

const COMMANDS: &[&str] = &["deal", "eval", "sim", "cfg"];

/// Parse `args` and run the selected command.
///
/// Returns [`exit_code::SUCCESS`] or [`exit_code::ERROR`]. Help and version
/// output go to `out`; usage errors and command failures go to `err`.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match FeltCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    match dispatch(cli.cmd, out, err) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn dispatch(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Deal { seed, seats } => {
            let cfg = config::load()?;
            handle_deal_command(&cfg, seed, seats, out)
        }
        Commands::Eval {
            cards,
            board,
            opponents,
            iterations,
            seed,
        } => handle_eval_command(&cards, &board, opponents, iterations, seed, out),
        Commands::Sim {
            hands,
            seed,
            seats,
            profile,
            output,
        } => {
            let cfg = config::load()?;
            handle_sim_command(&cfg, hands, seed, seats, profile, output, out, err)
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version are not errors
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let mut report = || -> std::io::Result<()> {
        writeln!(err, "{}", e)?;
        writeln!(err)?;
        writeln!(err, "Felt Poker CLI")?;
        writeln!(err, "Usage: felt <command> [options]\n")?;
        writeln!(err, "Commands:")?;
        for c in COMMANDS {
            writeln!(err, "  {}", c)?;
        }
        writeln!(err, "\nFor full help, run: felt --help")
    };
    let _ = report();
    exit_code::ERROR
}
