use anyhow::Context;
use hunt_tracker::config::Config;
use hunt_tracker::horus::{Horus, HorusClient};
use hunt_tracker::marks::MarksInfo;
use hunt_tracker::tracker::{self, HuntTracker};
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() {
    // 로깅 초기화: 콘솔 + 일별 로테이션 파일
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("tracker")
        .filename_suffix("log")
        .build("logs")
        .expect("initializing rolling file appender failed");

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr.and(non_blocking))
        .with_ansi(true)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = if args.is_empty() {
        Cow::from("./config.toml")
    } else {
        Cow::from(args.remove(0))
    };

    let config = match get_config(&*config_path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return;
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Tracker error: {}", e);
        tracing::error!("  {:?}", e);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let marks = MarksInfo::load(&config.marks.path).await?;
    let client = HorusClient::new(&config.horus).context("could not create Horus client")?;
    let horus = Arc::new(Horus::new(
        client,
        config.horus.regions.clone(),
        marks,
        Duration::from_secs(config.horus.cache_ttl_secs),
    ));

    let tracker = HuntTracker::new(horus, config.tracker.worlds.clone());
    for subscription in &config.subscriptions {
        tracker
            .subscriptions()
            .apply(subscription)
            .await
            .with_context(|| format!("invalid subscription for channel {}", subscription.channel))?;
    }

    // Background tasks
    tracker::spawn_announce_task(tracker.notices());
    tracker::spawn_recheck_task(
        Arc::clone(&tracker),
        Duration::from_secs(config.tracker.interval_secs),
    );

    tracing::info!(
        "Tracking {} worlds across {} regions",
        tracker.watched_worlds().await.len(),
        config.horus.regions.len()
    );

    tokio::signal::ctrl_c()
        .await
        .context("could not listen for shutdown signal")?;
    tracing::info!("Shutting down");
    Ok(())
}

async fn get_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let mut f = File::open(path)
        .await
        .context("could not open config file")?;
    let mut toml = String::new();
    f.read_to_string(&mut toml)
        .await
        .context("could not read config file")?;
    let config = toml::from_str(&toml).context("could not parse config file")?;

    Ok(config)
}
