//! Command-line arguments for the scoreboard server.

use clap::Parser;

/// Basketball scoreboard clock engine server.
#[derive(Debug, Clone, Parser)]
#[command(name = "scoreboard-back")]
#[command(about = "Scoreboard clock engine with live SSE updates and remote live-score sync")]
pub struct Cli {
    /// Left team name
    #[arg(long)]
    pub team_a: Option<String>,

    /// Right team name
    #[arg(long)]
    pub team_b: Option<String>,

    /// Game clock seconds per period (e.g. 600 for 10:00)
    #[arg(long)]
    pub game: Option<u32>,

    /// Shot clock seconds (e.g. 24)
    #[arg(long)]
    pub shot: Option<u32>,

    /// Number of periods
    #[arg(long)]
    pub periods: Option<u32>,

    /// HTTP port (defaults to PORT / SERVER_PORT, then 8080)
    #[arg(long)]
    pub port: Option<u16>,

    /// Do not connect to the remote live-score store
    #[arg(long)]
    pub offline: bool,
}
