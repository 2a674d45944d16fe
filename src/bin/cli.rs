//! devto-rss CLI
//!
//! Builds an RSS feed of DEV.to's top articles once, on a randomized loop,
//! or on a loop while serving the feed over HTTP.

use std::future::{Future, pending};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use devto_rss::{
    error::Result,
    models::Config,
    pipeline::{IntervalSchedule, Refresher, run_daemon},
    server,
    services::DevToClient,
    storage::JsonStateStore,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;

/// devto-rss - DEV.to top articles as an RSS feed
#[derive(Parser, Debug)]
#[command(
    name = "devto-rss",
    version,
    about = "Generate an RSS feed of DEV.to's top articles of the month"
)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of top articles to include
    #[arg(long)]
    limit: Option<usize>,

    /// Ranking window in days
    #[arg(long)]
    top_days: Option<u32>,

    /// Where to write the feed
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to keep the seen-article state
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Keep refreshing until interrupted
    #[arg(long)]
    daemon: bool,

    /// Minimum seconds between refreshes
    #[arg(long)]
    min_interval: Option<u64>,

    /// Maximum seconds between refreshes
    #[arg(long)]
    max_interval: Option<u64>,

    /// Serve the feed over HTTP while refreshing
    #[arg(long)]
    serve: bool,

    /// HTTP port for --serve
    #[arg(long)]
    port: Option<u16>,

    /// HTTP bind address for --serve
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Overlay command-line values onto the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(limit) = self.limit {
            config.provider.limit = limit;
        }
        if let Some(days) = self.top_days {
            config.provider.top_days = days;
        }
        if let Some(output) = &self.output {
            config.paths.output = output.clone();
        }
        if let Some(state_file) = &self.state_file {
            config.paths.state_file = state_file.clone();
        }
        if let Some(min) = self.min_interval {
            config.schedule.min_interval_secs = min;
        }
        if let Some(max) = self.max_interval {
            config.schedule.max_interval_secs = max;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl+C: {}", e);
        pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

async fn daemon_loop(
    refresher: &Refresher,
    config: &Config,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let schedule = IntervalSchedule::from_config(&config.schedule)?;
    let mut rng = StdRng::seed_from_u64(rand::random());
    run_daemon(refresher, schedule, &mut rng, shutdown).await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Config::load_or_default(path)
        }
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;
    let config = Arc::new(config);

    let source = Arc::new(DevToClient::new(&config.provider)?);
    let state = Arc::new(JsonStateStore::new(&config.paths.state_file));
    let refresher = Refresher::new(Arc::clone(&config), source, state);
    refresher.prepare().await?;

    if cli.serve {
        let listener = server::bind(&config.server).await?;
        let (stop_tx, stop_rx) = watch::channel(false);
        let feed = refresher.feed_file().clone();
        let handle = tokio::spawn(server::serve(
            listener,
            feed,
            server::shutdown_signal(stop_rx),
        ));

        daemon_loop(&refresher, &config, ctrl_c()).await?;

        let _ = stop_tx.send(true);
        match handle.await {
            Ok(result) => result?,
            Err(e) => log::error!("Server task failed: {}", e),
        }
    } else if cli.daemon {
        daemon_loop(&refresher, &config, ctrl_c()).await?;
    } else {
        let report = refresher.run_cycle().await?;
        log::info!(
            "Done: {} items ({} new) written to {}",
            report.item_count,
            report.new_ids.len(),
            report.output.display()
        );
    }

    Ok(())
}
