use std::sync::Arc;
use std::time::Duration;
use tokencatcher::config::Config;
use tokencatcher::notify::{run_dispatcher, TelegramNotifier};
use tokencatcher::pipeline::{Allowlist, DedupLedger, FilterGate, HttpResolver};
use tokencatcher::stream::StreamManager;
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    // NOTE: Workaround for rustls issue
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Can't set crypto provider to aws_lc_rs");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}. Check your .env file", e);
            std::process::exit(1);
        }
    };

    log::info!("🚀 Starting TokenCatcher...");
    log::info!("📊 Configuration:");
    log::info!("   Stream URL: {}", config.stream_url);
    log::info!("   Allow-list: {}", config.allowed_accounts_file);
    log::info!("   Seen-posts ledger: {}", config.seen_posts_file);
    log::info!("   Metadata timeout: {}s", config.metadata_timeout_secs);
    log::info!("   Reconnect delay: {}s", config.reconnect_delay_secs);

    let allowlist = Allowlist::load(&config.allowed_accounts_file);
    let ledger = DedupLedger::load(&config.seen_posts_file);
    let resolver = HttpResolver::new(Duration::from_secs(config.metadata_timeout_secs))?;
    let gate = FilterGate::new(Box::new(resolver), allowlist, ledger);

    // Bounded channel between frame processing and outbound delivery so
    // Telegram latency never blocks stream intake
    let (notify_tx, notify_rx) = mpsc::channel(256);

    let notifier = Arc::new(TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    ));
    tokio::spawn(run_dispatcher(notify_rx, notifier));

    let mut manager = StreamManager::new(
        config.stream_url.clone(),
        Duration::from_secs(config.reconnect_delay_secs),
        gate,
        notify_tx,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = manager.run(shutdown_rx);
    tokio::pin!(run);

    tokio::select! {
        _ = &mut run => {
            log::warn!("Stream manager exited");
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutdown signal received, closing stream");
            let _ = shutdown_tx.send(true);
            run.await;
        }
    }

    Ok(())
}
