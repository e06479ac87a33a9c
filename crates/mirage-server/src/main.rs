//! Entry point for the Mirage honeypot service.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mirage_core::config::HoneypotConfig;
use mirage_core::MirageError;
use mirage_engage::GroqClient;
use mirage_server::routes;
use mirage_server::routes::AppState;

#[derive(Parser)]
#[command(name = "mirage-server")]
#[command(about = "Conversational honeypot for scam engagement and intelligence capture")]
struct Cli {
    /// Config file prefix (default: mirage).
    #[arg(short, long, default_value = "mirage")]
    config: String,

    /// Override the bind address from config.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let bind = cli.bind.clone().unwrap_or_else(|| config.bind_addr.clone());

    if config.groq_api_key.is_empty() {
        tracing::warn!("No generation API key configured; running on lexicon fallbacks only");
    }

    let llm = Arc::new(GroqClient::new(
        &config.groq_api_key,
        &config.llm_model,
        Duration::from_secs(config.llm_timeout_secs),
    )?);

    let state = web::Data::new(AppState::new(config, llm));
    tracing::info!(%bind, "Mirage honeypot listening");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes::configure))
        .bind(&bind)?
        .run()
        .await?;

    Ok(())
}

fn load_config(file_prefix: &str) -> Result<HoneypotConfig, MirageError> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("MIRAGE")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| MirageError::Config(e.to_string()))?;

    match cfg.get::<HoneypotConfig>("honeypot") {
        Ok(c) => Ok(c),
        Err(_) => Ok(HoneypotConfig::default()),
    }
}
