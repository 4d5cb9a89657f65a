//! CLI entrypoint for dashboard
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dashboard_application::{
    NoProgress, ProgressNotifier, QueryRegistry, RequestConfig, RequestScope, RunQueriesUseCase,
};
use dashboard_domain::parse_range_args;
use dashboard_infrastructure::{ConfigLoader, FileConfig, build_providers};
use dashboard_presentation::{
    AppState, Cli, ConsoleFormatter, DashboardServer, OutputFormat, ProgressReporter, router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let mut config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    // === Dependency Injection ===
    let providers = build_providers(&config.providers);
    if providers.is_empty() {
        warn!("No data providers configured, every request will return an empty result");
    }

    let registry = QueryRegistry::build(&providers)
        .await
        .context("Startup failed")?;
    info!(queries = ?registry.names(), "Registered {} queries", registry.len());

    let use_case = Arc::new(RunQueriesUseCase::new(Arc::new(registry)));
    let request = config.request.to_request_config();

    match cli.one_shot_range() {
        Some((begin, end)) => run_once(&cli, &use_case, &request, begin, end).await,
        None => serve(&config, use_case, request).await,
    }
}

/// `-v` flags pick the level; `RUST_LOG` wins when set.
fn init_logging(cli: &Cli) {
    let default_level = match cli.verbose {
        0 if cli.one_shot_range().is_some() => "warn",
        0 | 1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flags override every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(static_dir) = &cli.static_dir {
        config.server.static_dir = static_dir.clone();
    }
    if let Some(date_format) = cli.date_format {
        config.request.date_format = date_format;
    }
    if let Some(timeout) = cli.timeout {
        config.request.timeout_seconds = Some(timeout);
    }
}

/// Cancel `token` on Ctrl+C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Ctrl+C received, shutting down");
                token.cancel();
            }
        }
    });
}

async fn run_once(
    cli: &Cli,
    use_case: &RunQueriesUseCase,
    request: &RequestConfig,
    begin: &str,
    end: &str,
) -> Result<()> {
    let range = parse_range_args(begin, end, request.date_format)?;

    let scope = RequestScope::with_timeout(request.timeout);
    cancel_on_ctrl_c(scope.token().clone());

    let reporter = ProgressReporter::new();
    let progress: &dyn ProgressNotifier = if cli.quiet { &NoProgress } else { &reporter };

    let outcome = use_case
        .execute_with_progress(range, scope.token(), progress)
        .await;

    let output = match cli.output {
        OutputFormat::Json => {
            let mut json = ConsoleFormatter::format_json_pretty(&outcome.results)?;
            json.push('\n');
            json
        }
        OutputFormat::Text => ConsoleFormatter::format_text(&outcome.results),
    };
    print!("{}", output);

    if !cli.quiet {
        eprintln!("{}", ConsoleFormatter::format_summary(&outcome));
    }

    Ok(())
}

async fn serve(
    config: &FileConfig,
    use_case: Arc<RunQueriesUseCase>,
    request: RequestConfig,
) -> Result<()> {
    let listener = DashboardServer::bind(&config.server.bind).await?;

    let state = Arc::new(AppState::new(use_case, request));
    let app = router(state, &config.server.static_dir);

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    DashboardServer::serve(listener, app, shutdown).await?;
    Ok(())
}
