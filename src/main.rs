use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hnfeed::app::AppContext;
use hnfeed::cli::{commands, Cli, Commands};
use hnfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let workers = cli.workers.unwrap_or(config.feed.max_concurrent_fetches);
    let ctx = AppContext::with_workers(cli.db, config, workers)?;

    match cli.command {
        Commands::Run {
            interval,
            no_initial_reload,
        } => {
            commands::run(&ctx, interval.as_deref(), no_initial_reload).await?;
        }
        Commands::Reload => {
            commands::reload(&ctx).await?;
        }
        Commands::List {
            filter,
            limit,
            text,
        } => {
            commands::list(&ctx, filter.as_deref(), limit, text).await?;
        }
        Commands::Sort { key } => {
            commands::sort(&ctx, key).await?;
        }
        Commands::Headline { mode } => {
            commands::headline(&ctx, mode).await?;
        }
        Commands::Title => {
            commands::title(&ctx).await?;
        }
        Commands::Open { position } => {
            commands::open_story(&ctx, position).await?;
        }
    }

    Ok(())
}
