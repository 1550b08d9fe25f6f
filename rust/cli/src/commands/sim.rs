//! Simulation command: an all-CPU table played through the async runtime.
//!
//! Every seat is driven by the heuristic strategy with zero-length timers,
//! so a run exercises the same scheduler, watchdog and auto-deal path a
//! live table uses. Hand histories can be written as JSONL.
//!
//! ```no_run
//! use felt_cli::commands::sim::handle_sim_command;
//! use felt_cli::config::Config;
//! use std::io;
//!
//! let cfg = Config::default();
//! handle_sim_command(&cfg, 100, Some(42), None, None, Some("data/sim.jsonl".into()),
//!     &mut io::stdout(), &mut io::stderr()).unwrap();
//! ```

use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;
use felt_ai::Profile;
use felt_engine::logger::HandLogger;
use felt_runtime::{RuntimeConfig, RuntimeError, TableEvent, spawn_table};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug)]
struct SimSummary {
    hands: u64,
    forced: usize,
    game_over: bool,
    stacks: Vec<u32>,
}

#[allow(clippy::too_many_arguments)]
pub fn handle_sim_command(
    cfg: &Config,
    hands: u64,
    seed: Option<u64>,
    seats: Option<usize>,
    profile: Option<Profile>,
    output: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }

    let mut cfg = cfg.clone();
    if let Some(seats) = seats {
        cfg.seats = seats;
    }
    if let Some(profile) = profile {
        cfg.profile = profile;
    }
    // always record the seed so the run can be replayed
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    cfg.seed = Some(seed);
    config::validate(&cfg)?;

    let runtime_config = RuntimeConfig {
        hand_limit: Some(hands),
        ..cfg.runtime_config()
    };
    let mut logger = output.as_deref().map(HandLogger::create).transpose()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let summary = rt.block_on(run_table(runtime_config, &mut logger))?;

    writeln!(
        out,
        "Simulated {} hands (seed {}, {} seats, {})",
        summary.hands, seed, cfg.seats, cfg.profile
    )?;
    for (seat, stack) in summary.stacks.iter().enumerate() {
        writeln!(out, "Seat {}: {}", seat, stack)?;
    }
    let chips: u64 = summary.stacks.iter().map(|&s| s as u64).sum();
    writeln!(out, "Chips in play: {}", chips)?;
    writeln!(out, "Forced actions: {}", summary.forced)?;
    if let Some(path) = &output {
        writeln!(out, "History: {} ({} records)", path, summary.hands)?;
    }
    if summary.game_over && summary.hands < hands {
        ui::display_warning(
            err,
            &format!(
                "table finished after {} of {} hands: one seat holds every chip",
                summary.hands, hands
            ),
        )?;
    }
    Ok(())
}

async fn run_table(config: RuntimeConfig, logger: &mut Option<HandLogger>) -> Result<SimSummary, CliError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = move |event: &TableEvent| {
        if matches!(
            event,
            TableEvent::HandHistory { .. } | TableEvent::ForcedAction { .. } | TableEvent::Finished { .. }
        ) {
            let _ = tx.send(event.clone());
        }
    };
    let table = spawn_table(config, Arc::new(sink))?;
    table.begin_hand().await?;

    let mut hands = 0;
    let mut forced = 0;
    let game_over = loop {
        match rx.recv().await {
            Some(TableEvent::HandHistory { record }) => {
                hands += 1;
                if let Some(logger) = logger.as_mut() {
                    logger.write(&record)?;
                }
            }
            Some(TableEvent::ForcedAction { .. }) => forced += 1,
            Some(TableEvent::Finished { game_over, .. }) => break game_over,
            Some(_) => {}
            None => return Err(RuntimeError::Closed.into()),
        }
    };

    let state = table.snapshot().await?;
    table.shutdown().await?;
    Ok(SimSummary {
        hands,
        forced,
        game_over,
        stacks: state.seats.iter().map(|s| s.stack).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(hands: u64, seed: u64) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_sim_command(
            &Config::default(),
            hands,
            Some(seed),
            Some(4),
            None,
            None,
            &mut out,
            &mut err,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn zero_hands_is_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = handle_sim_command(&Config::default(), 0, None, None, None, None, &mut out, &mut err);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn conserves_chips_and_never_forces() {
        let (out, _) = sim(10, 77);
        assert!(out.contains("seed 77, 4 seats, tight"));
        assert!(out.contains("Chips in play: 40000"));
        assert!(out.contains("Forced actions: 0"));
    }

    #[test]
    fn same_seed_same_result() {
        assert_eq!(sim(8, 5).0, sim(8, 5).0);
    }
}
