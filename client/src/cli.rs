use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "Connect Four Search Client")]
#[clap(about = "Plays Connect Four games between search engines", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    SelfPlay(SelfPlayCommand),
}

#[derive(Args)]
pub struct SelfPlayCommand {
    #[clap(short, long, default_value_t = String::from("client.conf"))]
    pub config: String,

    /// Player two plays the oracle's preferred move without searching.
    #[clap(long)]
    pub raw_player_two: bool,

    /// Columns to play before the engines take over, e.g. "4 4 3".
    #[clap(short, long)]
    pub opening: Option<String>,
}
