mod bot;
mod commands;
mod telegram;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pricebot_scraper::{extract_product_url, PriceLookup};
use tracing_subscriber::EnvFilter;

use crate::telegram::TelegramClient;

#[derive(Debug, Parser)]
#[command(name = "pricebot")]
#[command(about = "Telegram bot that looks up Amazon product prices")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the Telegram bot (the default).
    Run,
    /// Look up one product from the terminal without starting the bot.
    Lookup {
        /// A product URL, or any text containing one.
        #[arg(required = true)]
        text: Vec<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot().await,
        Commands::Lookup { text, json } => run_lookup(&text.join(" "), json).await,
    }
}

async fn run_bot() -> anyhow::Result<()> {
    let config = pricebot_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    tracing::info!(?config, "configuration loaded");

    let lookup = Arc::new(PriceLookup::from_config(&config.scraper)?);
    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_bot_token,
        config.poll_timeout_secs,
    )?);

    bot::run(telegram, lookup, config.poll_timeout_secs, shutdown_signal())
        .await
        .context("could not start polling; check TELEGRAM_BOT_TOKEN")?;

    tracing::info!("bot stopped");
    Ok(())
}

async fn run_lookup(text: &str, json: bool) -> anyhow::Result<()> {
    let config = pricebot_core::load_scraper_config()?;
    let level = std::env::var("PRICEBOT_LOG_LEVEL").unwrap_or_else(|_| "warn".to_owned());
    init_tracing(&level)?;

    let url = extract_product_url(text).context("no Amazon product link found in input")?;
    let lookup = PriceLookup::from_config(&config)?;
    let product = lookup.lookup(url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
    } else {
        println!("{}\nPrice: {}\n{}", product.title, product.price, product.url);
    }
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
/// Logs go to stderr so `lookup` output on stdout stays clean.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping");
}
