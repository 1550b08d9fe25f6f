use clap::{Parser, Subcommand};
use felt_ai::Profile;

#[derive(Parser, Debug)]
#[command(
    name = "felt",
    version,
    about = "Felt poker table: deal, evaluate and simulate hands"
)]
pub struct FeltCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal one hand and show every seat's cards and the board to come
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        seats: Option<usize>,
    },
    /// Rank 5 to 7 cards, or estimate equity for 2 hole cards
    Eval {
        /// Card codes such as Ah Td 2c
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
        /// Known board cards when estimating equity
        #[arg(long, num_args = 0..=5)]
        board: Vec<String>,
        #[arg(long, default_value_t = 1)]
        opponents: usize,
        #[arg(long, default_value_t = 10_000)]
        iterations: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play an all-CPU table through the timer runtime
    Sim {
        #[arg(long)]
        hands: u64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        seats: Option<usize>,
        /// tight or loose
        #[arg(long)]
        profile: Option<Profile>,
        /// Write hand histories here as JSONL
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

