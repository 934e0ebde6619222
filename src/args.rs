use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(
    display_name = "team-model",
    about = "Rating and team-formation engine for small-sided football groups",
    long_about = "Maintains per-context player ratings and pairwise interaction ledgers \
    from match results and post-match feedback, and proposes balanced team splits \
    for upcoming matches."
)]
pub struct Args {
    /// Path to the serialized model-state blob for one context.
    /// A fresh state is created if the file does not exist yet.
    #[arg(short, long, env = "TEAM_MODEL_STATE")]
    pub state: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Ingest one finished match (plus optional feedback), print the
    /// per-player breakdown and persist the updated state
    Update {
        /// Match JSON assembled by the host
        #[arg(short, long = "match")]
        match_file: PathBuf,

        /// Quick-feedback JSON (anchor votes, pairwise verdicts, fan polarities)
        #[arg(short, long)]
        quick: Option<PathBuf>,

        /// Expanded-feedback JSON (explicit synergies, dominations, role impressions)
        #[arg(short, long)]
        expanded: Option<PathBuf>
    },

    /// Print ranked team splits for an upcoming match (read-only)
    Teams {
        #[arg(short, long)]
        venue: String,

        /// Comma-separated participant ids
        #[arg(short, long, value_delimiter = ',')]
        players: Vec<String>,

        /// How many suggestions to return
        #[arg(long, default_value_t = 3)]
        top_n: usize,

        /// Also propose one-swap alternatives against the best split
        #[arg(long)]
        swaps: bool
    },

    /// Fold a JSONL file of matches into the state and print the resulting
    /// leaderboard
    Replay {
        /// One match JSON object per line, in chronological order
        #[arg(short, long)]
        matches: PathBuf
    }
}
