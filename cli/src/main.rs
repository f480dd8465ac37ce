//! CLI entrypoint for boardroom
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;
mod wiring;

use anyhow::{Context, Result, bail};
use boardroom_application::DeadlineSweeper;
use boardroom_domain::ConfigIssue;
use boardroom_infrastructure::{ConfigLoader, FileConfig};
use boardroom_presentation::{
    AppState, Cli, Command, ConsoleFormatter, OutputFormat, Scenario, Simulation, create_router,
};
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wiring::Services;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_json, cli.log_dir.as_deref())?;

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    match cli.command {
        Command::Config => show_config(&file_config, cli.config.as_ref()),
        Command::Serve { listen } => {
            check_config(&file_config)?;
            serve(&file_config, listen).await
        }
        Command::Simulate {
            scenario,
            title,
            max_rounds,
            output,
        } => {
            check_config(&file_config)?;
            simulate(&file_config, scenario, &title, max_rounds, output).await
        }
    }
}

/// Log warnings, refuse to start on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    let (fatal, warnings): (Vec<ConfigIssue>, Vec<ConfigIssue>) =
        issues.into_iter().partition(ConfigIssue::is_fatal);
    for issue in &warnings {
        warn!("{}", issue.message);
    }
    if !fatal.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&fatal));
        bail!("Invalid configuration ({} error(s))", fatal.len());
    }
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&std::path::PathBuf>) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    println!();
    println!("{}", toml::to_string_pretty(config)?);

    let issues = config.validate();
    if issues.is_empty() {
        println!("No configuration issues.");
    } else {
        println!("{}", ConsoleFormatter::format_issues(&issues));
    }
    Ok(())
}

async fn serve(config: &FileConfig, listen: Option<String>) -> Result<()> {
    let addr: SocketAddr = match listen {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid listen address '{raw}'"))?,
        None => config
            .server
            .parse_listen_addr()
            .0
            .context("server.listen_addr is invalid")?,
    };

    let services = Services::build(config, config.to_governance_config())?;
    let root = CancellationToken::new();
    services.start_dispatch(&root);

    let sweeper = DeadlineSweeper::new(services.governance.clone(), services.config.sweep_interval);
    let sweep_task = tokio::spawn(sweeper.run(root.child_token()));

    let app = create_router(AppState::new(
        services.governance.clone(),
        services.dispatcher.clone(),
    ));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        max_veto_rounds = services.config.max_veto_rounds,
        "Boardroom listening on {}", addr
    );

    let shutdown = root.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .context("HTTP server failed")?;

    info!("Boardroom shutting down");
    root.cancel();
    if let Err(e) = sweep_task.await {
        warn!("Deadline sweeper ended abnormally: {}", e);
    }
    Ok(())
}

async fn simulate(
    config: &FileConfig,
    scenario: Scenario,
    title: &str,
    max_rounds: Option<u32>,
    output: OutputFormat,
) -> Result<()> {
    let mut governance = config.to_governance_config();
    if let Some(max) = max_rounds {
        governance = governance.with_max_veto_rounds(max);
    }

    let services = Services::build(config, governance)?;
    let root = CancellationToken::new();
    services.start_dispatch(&root);

    let report = Simulation::new(services.bus.clone(), services.governance.clone())
        .run(scenario, title, &root)
        .await;
    root.cancel();
    let report = report?;

    let rendered = match output {
        OutputFormat::Text => ConsoleFormatter::format(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{rendered}");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received terminate signal, initiating graceful shutdown"),
    }
}
