use chrono::Local;

use crate::app::{AppContext, HnError, Result};
use crate::cli::HeadlineMode;
use crate::coordinator::ReloadOutcome;
use crate::daemon::{Daemon, DaemonConfig};
use crate::domain::{SortKey, Story};
use crate::filter;

const TEXT_PREVIEW_CHARS: usize = 200;

pub async fn run(ctx: &AppContext, interval: Option<&str>, no_initial_reload: bool) -> Result<()> {
    let interval = interval.unwrap_or(ctx.config.feed.reload_interval.as_str());
    let update_interval_secs = DaemonConfig::parse_interval(interval).map_err(HnError::Config)?;

    let daemon = Daemon::new(
        ctx.coordinator.clone(),
        DaemonConfig {
            update_interval_secs,
            update_on_start: !no_initial_reload,
        },
    );
    daemon.watch_signals();
    daemon.run().await
}

pub async fn reload(ctx: &AppContext) -> Result<()> {
    match ctx.coordinator.reload().await {
        ReloadOutcome::Updated { stories } => println!("Reloaded {} stories", stories),
        ReloadOutcome::Unchanged => println!("Nothing new; kept the current feed"),
        ReloadOutcome::TimedOut => eprintln!("Reload timed out; kept the current feed"),
        ReloadOutcome::Skipped => println!("A reload is already running"),
    }

    if let Some(title) = ctx.coordinator.snapshot().await.menu_title {
        println!("Headline: {}", title);
    }
    Ok(())
}

pub async fn list(
    ctx: &AppContext,
    query: Option<&str>,
    limit: Option<usize>,
    with_text: bool,
) -> Result<()> {
    let snapshot = ctx.coordinator.snapshot().await;
    let stories = filter::filter(&snapshot.stories, query.unwrap_or_default());

    if stories.is_empty() {
        println!("No stories");
        return Ok(());
    }

    println!("Sorted by {}", snapshot.sort_key);
    let limit = limit.unwrap_or(stories.len());
    for (index, story) in stories.iter().take(limit).enumerate() {
        print_story(index + 1, story, with_text);
    }

    Ok(())
}

fn print_story(position: usize, story: &Story, with_text: bool) {
    let date = story
        .published_at()
        .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "                ".to_string());

    println!(
        "{:>3}. {} {:>5} pts {:>4} comments  {}",
        position,
        date,
        story.score,
        story.comments(),
        story.display_title()
    );
    if let Some(url) = &story.url {
        println!("      {}", url);
    }

    if with_text {
        if let Some(text) = story.plain_text() {
            let preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
            println!("      {}", preview.replace('\n', " "));
        }
    }
}

pub async fn sort(ctx: &AppContext, key: SortKey) -> Result<()> {
    ctx.coordinator.select_sort_key(key).await;

    let snapshot = ctx.coordinator.snapshot().await;
    println!("Sorted by {}", snapshot.sort_key);
    if let Some(first) = snapshot.stories.first() {
        println!("First: {}", first.display_title());
    }
    Ok(())
}

pub async fn headline(ctx: &AppContext, mode: Option<HeadlineMode>) -> Result<()> {
    let show = match mode {
        Some(HeadlineMode::On) => {
            ctx.coordinator.set_show_headline(true).await;
            true
        }
        Some(HeadlineMode::Off) => {
            ctx.coordinator.set_show_headline(false).await;
            false
        }
        Some(HeadlineMode::Toggle) => ctx.coordinator.toggle_headline().await,
        None => ctx.coordinator.snapshot().await.show_headline,
    };

    println!("Headline {}", if show { "on" } else { "off" });
    Ok(())
}

pub async fn title(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.coordinator.headline().await);
    Ok(())
}

pub async fn open_story(ctx: &AppContext, position: usize) -> Result<()> {
    let snapshot = ctx.coordinator.snapshot().await;
    let story = snapshot
        .story_at(position)
        .ok_or_else(|| HnError::StoryNotFound(format!("position {}", position)))?;

    let discussion = story.discussion_url();
    open::that(&discussion)?;
    println!("Opened {}", discussion);

    if let Some(url) = &story.url {
        open::that(url)?;
        println!("Opened {}", url);
    }

    Ok(())
}
