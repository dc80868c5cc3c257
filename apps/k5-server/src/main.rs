use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use authn_resolver::{Service as AuthNService, StaticAccountStore};
use authz_resolver::{PolicyEvaluator, StaticResourceStore};
use clap::Parser;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;

mod config;
mod logging;
mod routes;

use config::AppConfig;
use routes::AppState;

/// K5 authentication and authorization server.
#[derive(Debug, Parser)]
#[command(name = "k5-server", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config/k5.yaml")]
    config: PathBuf,

    /// Print the effective configuration (secrets redacted) and exit.
    #[arg(long)]
    print_config: bool,

    /// Issue a bearer token for the given account identifier and exit.
    #[arg(long, value_name = "IDENTIFIER")]
    issue_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(&cli.config)?;

    if cli.print_config {
        println!("{cfg:#?}");
        return Ok(());
    }

    logging::init(&cfg.logging)?;

    let state = build_state(&cfg)?;

    if let Some(identifier) = cli.issue_token.as_deref() {
        let issued = state
            .authn
            .issue_for_account(identifier)
            .await
            .with_context(|| format!("cannot issue a token for '{identifier}'"))?;
        println!("{}", issued.access_token.expose_secret());
        return Ok(());
    }

    let app = routes::router(state, &cfg.api_gateway)?;

    let listener = TcpListener::bind(&cfg.api_gateway.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.api_gateway.bind_addr))?;
    tracing::info!(addr = %cfg.api_gateway.bind_addr, "k5-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("k5-server stopped");
    Ok(())
}

fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    if cfg.authn.accounts.is_empty() {
        tracing::warn!("no accounts configured; every token will resolve to account_not_found");
    }
    let accounts = StaticAccountStore::new(cfg.authn.accounts.clone());
    let authn = AuthNService::from_config(&cfg.authn, Arc::new(accounts))
        .context("invalid authn configuration")?;

    let articles = StaticResourceStore::new("article", cfg.authz.articles.clone());
    let orders = StaticResourceStore::new("order", cfg.authz.orders.clone());
    tracing::info!(
        articles = articles.len(),
        orders = orders.len(),
        owner_identity = cfg.authz.owner_identity.as_str(),
        "authz resolver configured"
    );

    Ok(AppState {
        authn: Arc::new(authn),
        articles: Arc::new(PolicyEvaluator::new(
            Arc::new(articles),
            cfg.authz.owner_identity,
        )),
        orders: Arc::new(PolicyEvaluator::new(
            Arc::new(orders),
            cfg.authz.owner_identity,
        )),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
