use anyhow::Context;
use clap::Parser;

mod bootstrap;

/// Project manager issue service.
#[derive(Debug, Parser)]
#[command(name = "pm-server", version, about = "Project manager issue service")]
struct Cli {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long)]
    bind: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("pm-server error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = pm_config::PmConfig::load_with_dotenv().context("failed to load configuration")?;
    let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
    let state = bootstrap::app_state(&config).await?;

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "pm-server listening");

    axum::serve(listener, pm_server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated")?;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}
