mod cli;
mod play;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use common::{env_usize, relative_to_cwd, ConfigLoader};
use connect4::{Action, Engine};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use mcts::SearchOptions;
use model::UniformOracle;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut builder = tokio::runtime::Builder::new_multi_thread();

    builder.enable_all();

    if let Some(worker_threads) = env_usize("TOKIO_THREADS")? {
        builder.worker_threads(worker_threads);
    }

    info!("{:?}", builder);

    builder.build()?.block_on(async_main())?;

    Ok(())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::SelfPlay(self_play_args) => {
            let config_path = relative_to_cwd(&self_play_args.config)?;
            let config = ConfigLoader::new(config_path, "self_play")?;

            let options: SearchOptions = config.load()?;
            info!("{:?}", options);

            let opening = self_play_args
                .opening
                .clone()
                .or_else(|| config.get("opening").and_then(|v| v.as_string()))
                .map(|opening| Action::parse_sequence(&opening))
                .transpose()?
                .unwrap_or_default();

            let engine = Engine::new();
            let oracle = UniformOracle::new(&engine);

            play::play_game(
                &engine,
                &oracle,
                &opening,
                &options,
                self_play_args.raw_player_two,
            )
            .await?;
        }
    }

    Ok(())
}
