//! Command handlers for the `felt` CLI.
//!
//! Each command lives in its own module and exposes one
//! `handle_COMMAND_command(...) -> Result<(), CliError>` taking its output
//! streams as `&mut dyn Write`.

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::handle_sim_command;
