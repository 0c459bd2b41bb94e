//! Periodic background reloads.
//!
//! Runs in the foreground until Ctrl-C or SIGTERM, reloading the feed on a
//! fixed interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::coordinator::{FeedCoordinator, ReloadOutcome};

/// Longest accepted reload interval: one year.
pub const MAX_INTERVAL_SECS: u64 = 365 * 86400;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Reload interval in seconds (default: 3600 = 1 hour)
    pub update_interval_secs: u64,
    /// Whether to reload immediately on start
    pub update_on_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 3600,
            update_on_start: true,
        }
    }
}

impl DaemonConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        let (digits, unit) = if let Some(hours) = s.strip_suffix('h') {
            (hours, 3600)
        } else if let Some(minutes) = s.strip_suffix('m') {
            (minutes, 60)
        } else if let Some(days) = s.strip_suffix('d') {
            (days, 86400)
        } else if let Some(secs) = s.strip_suffix('s') {
            (secs, 1)
        } else {
            (s.as_str(), 1)
        };

        let count = digits
            .parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s))?;
        let secs = count
            .checked_mul(unit)
            .filter(|secs| *secs <= MAX_INTERVAL_SECS)
            .ok_or_else(|| "Interval too large".to_string())?;

        if secs == 0 {
            return Err("Interval must be greater than zero".to_string());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Daemon runner
pub struct Daemon {
    coordinator: Arc<FeedCoordinator>,
    config: DaemonConfig,
    shutdown: CancellationToken,
}

impl Daemon {
    pub fn new(coordinator: Arc<FeedCoordinator>, config: DaemonConfig) -> Self {
        Self {
            coordinator,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops [`Daemon::run`] when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancels the shutdown token when the process receives Ctrl-C or SIGTERM.
    pub fn watch_signals(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        });
    }

    /// Run until the shutdown token is cancelled.
    pub async fn run(&self) -> crate::app::Result<()> {
        tracing::info!(
            "hnfeed daemon started (reload interval: {}, PID: {})",
            DaemonConfig::format_interval(self.config.update_interval_secs),
            std::process::id()
        );

        if self.config.update_on_start {
            tracing::info!("Running initial reload...");
            if self.run_update().await {
                return Ok(());
            }
        }

        let mut timer = interval(Duration::from_secs(self.config.update_interval_secs));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // Skip the first immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = timer.tick() => {}
            }

            tracing::info!("Running scheduled reload...");
            if self.run_update().await {
                break;
            }
        }

        tracing::info!("Daemon shutting down...");
        Ok(())
    }

    /// Runs one reload cycle. Returns true if shutdown arrived first.
    async fn run_update(&self) -> bool {
        let started = Local::now();

        let outcome = tokio::select! {
            _ = self.shutdown.cancelled() => return true,
            outcome = self.coordinator.reload() => outcome,
        };

        let elapsed = Local::now().signed_duration_since(started);
        match outcome {
            ReloadOutcome::Updated { stories } => tracing::info!(
                "Reload complete: {} stories ({:.1}s)",
                stories,
                elapsed.num_milliseconds() as f64 / 1000.0
            ),
            ReloadOutcome::Unchanged => tracing::info!("Reload complete: feed unchanged"),
            ReloadOutcome::TimedOut => tracing::warn!("Reload timed out"),
            ReloadOutcome::Skipped => tracing::debug!("Reload already running"),
        }

        false
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Failed to set up SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
