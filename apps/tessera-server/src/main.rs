mod config;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use authority::AuthorityModule;
use axum::Router;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Tessera Server - authority resolution and token issuing
#[derive(Parser)]
#[command(name = "tessera-server")]
#[command(about = "Tessera Server - authority resolution and token issuing")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (TESSERA__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    logging::init(&config.logging);

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    Ok(())
}

async fn connect(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database.url.clone());
    opts.max_connections(config.database.max_connections)
        .connect_timeout(config.database.connect_timeout)
        .sqlx_logging(false);

    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {}", redact(&config.database.url)))
}

/// Strip credentials from a connection URL before logging it.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        }
        _ => url.to_owned(),
    }
}

fn build_router(module: &AuthorityModule, config: &AppConfig) -> Router {
    let mut router = module.router().route("/health", get(|| async { "ok" }));

    // 3) Timeout
    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.server.request_timeout,
    ));

    // 2) Trace, with the request id recorded on the span
    router = router.layer(TraceLayer::new_for_http().make_span_with(
        |req: &Request<axum::body::Body>| {
            let rid = req
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("n/a");
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri().path(),
                request_id = %rid,
            )
        },
    ));

    // 1) Request id: set first (outermost), echoed on the response
    router = router.layer(PropagateRequestIdLayer::x_request_id());
    router.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;
    let addr = config.server.socket_addr()?;

    tracing::info!(database = %redact(&config.database.url), "Connecting to database");
    let db = connect(&config).await?;
    if config.database.migrate {
        AuthorityModule::migrate(&db)
            .await
            .context("database migration failed")?;
    }

    let module = AuthorityModule::new(&db, &config.auth, &config.authority)?;
    let router = build_router(&module, &config);
    let cancel = CancellationToken::new();
    let sweeper = module.spawn_token_sweeper(cancel.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "token sweeper task failed");
    }
    db.close().await.context("failed to close database")?;
    tracing::info!("Tessera Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("HTTP server shutting down gracefully");
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn redact_hides_credentials() {
        assert_eq!(
            redact("postgres://user:pw@db:5432/tessera"),
            "postgres://***@db:5432/tessera"
        );
        assert_eq!(redact("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            redact("sqlite://tessera.db?mode=rwc"),
            "sqlite://tessera.db?mode=rwc"
        );
    }

    #[test]
    fn cli_parses_flags_and_subcommand() {
        let cli = Cli::try_parse_from(["tessera-server", "-c", "cfg.yaml", "-p", "9000", "-vv", "check"])
            .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("cfg.yaml")));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Check)));
    }
}
