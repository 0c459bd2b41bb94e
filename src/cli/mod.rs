pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::SortKey;

#[derive(Parser)]
#[command(name = "hnfeed")]
#[command(about = "Hacker News top stories, kept fresh in the background", long_about = None)]
pub struct Cli {
    /// Maximum concurrent story requests (0 = no limit; default from config)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Database path (default: data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reload the feed periodically until interrupted
    Run {
        /// Reload interval (e.g., "1h", "30m", "1d"); default from config
        #[arg(short, long)]
        interval: Option<String>,

        /// Skip the reload on start
        #[arg(long)]
        no_initial_reload: bool,
    },
    /// Reload the feed once
    Reload,
    /// List stories in display order
    List {
        /// Only show stories whose type, title, url or text contain this
        #[arg(short, long)]
        filter: Option<String>,

        /// Show at most this many stories
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Include story text
        #[arg(long)]
        text: bool,
    },
    /// Sort by a key (original, time, score, comments, type or 1-5);
    /// choosing the active key again reverses the list
    Sort { key: SortKey },
    /// Show or change the menu-bar headline setting
    Headline {
        #[arg(value_enum)]
        mode: Option<HeadlineMode>,
    },
    /// Print the menu-bar title
    Title,
    /// Open a story's discussion and link in the browser
    Open {
        /// 1-based position in the current list
        position: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeadlineMode {
    On,
    Off,
    Toggle,
}
