use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "demolink")]
#[command(about = "Share-code and demo-URL tooling for CS2 replays")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a share-code into its match identifiers
    Decode {
        /// Share-code, e.g. CSGO-xxxxx-xxxxx-xxxxx-xxxxx-xxxxx
        share_code: String,
    },
    /// Encode match identifiers into a canonical share-code
    Encode {
        #[arg(long)]
        match_id: u64,
        #[arg(long)]
        outcome_id: u64,
        #[arg(long)]
        token: u64,
    },
    /// Mine a demo URL from a captured coordinator payload (JSON file)
    Extract {
        /// Path to the payload JSON ("-" reads stdin)
        payload: PathBuf,
        /// Share-code supplying the match id and token
        #[arg(long, conflicts_with_all = ["match_id", "token"])]
        share_code: Option<String>,
        #[arg(long, requires = "token")]
        match_id: Option<u64>,
        #[arg(long, requires = "match_id")]
        token: Option<u64>,
    },
}
