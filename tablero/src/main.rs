mod config;

use clap::{Parser, Subcommand};
use client::ApiClient;
use config::{BackendConfig, Config};
use dashboard::{ActiveTab, Session};
use metrics_exporter_statsd::StatsdBuilder;
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "tablero", about = "Workforce scheduling dashboard tooling")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short, default_value = "tablero.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the proxy relay in the foreground
    Relay,
    /// One-shot backend reachability probe
    Health,
    /// Print derived metrics for the flows and attendance tabs
    Summary {
        /// Day to summarize attendance for (YYYY-MM-DD)
        day: String,
    },
    /// Dispatch a Slack notification through the backend
    Notify { text: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    init_metrics(&config);

    let result = match cli.command {
        Command::Relay => run_relay(config).await,
        Command::Health => run_health(&config).await,
        Command::Summary { day } => run_summary(&config, &day).await,
        Command::Notify { text } => run_notify(&config, &text).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = match config
        .common
        .logging
        .as_ref()
        .and_then(|logging| logging.filter.clone())
    {
        Some(directives) => tracing_subscriber::EnvFilter::new(directives),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn init_metrics(config: &Config) {
    let Some(metrics_config) = &config.common.metrics else {
        return;
    };
    match StatsdBuilder::from(
        metrics_config.statsd_host.as_str(),
        metrics_config.statsd_port,
    )
    .build(Some("tablero"))
    {
        Ok(recorder) => {
            if let Err(err) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %err, "could not install metrics recorder");
            }
        }
        Err(err) => tracing::warn!(error = %err, "could not build statsd recorder"),
    }
}

fn require_backend(config: &Config) -> Result<&BackendConfig, Box<dyn Error>> {
    config
        .backend
        .as_ref()
        .ok_or_else(|| "missing 'backend' section in config".into())
}

async fn run_relay(config: Config) -> Result<ExitCode, Box<dyn Error>> {
    let relay_config = config.relay.unwrap_or_default().with_env_overrides();
    relay::run(relay_config).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_health(config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let api = ApiClient::new(&require_backend(config)?.base_url)?;
    if api.health().await {
        println!("backend reachable");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("backend unreachable");
        Ok(ExitCode::FAILURE)
    }
}

async fn run_summary(config: &Config, day: &str) -> Result<ExitCode, Box<dyn Error>> {
    let api = ApiClient::new(&require_backend(config)?.base_url)?;
    let collaborators = api.collaborators().await?;
    let mut session = Session::new(Arc::new(api));

    session.probe_health().await;
    println!("backend: {:?}", session.health());

    if let ActiveTab::Flows(tab) = session.active_mut() {
        tab.load(false).await?;
        let metrics = tab.metrics();
        println!(
            "flows: {} ({} profiles required)",
            metrics.flow_count, metrics.total_required
        );
    }

    session.switch_to_attendance(day);
    if let ActiveTab::Attendance(tab) = session.active_mut() {
        tab.load(false).await?;
        let metrics = tab.metrics();
        println!(
            "attendance {day}: {}/{} filled ({:.0}%)",
            metrics.filled_count, metrics.collaborator_count, metrics.coverage_pct
        );
        let names: HashMap<&str, &str> = collaborators
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        for entry in tab.entries() {
            let name = names
                .get(entry.collaborator_id.as_str())
                .copied()
                .unwrap_or(entry.collaborator_id.as_str());
            let code = match tab.effective_code(&entry.collaborator_id) {
                Some("") | None => "-",
                Some(code) => code,
            };
            println!("  {name}: {code}");
        }
        for (code, count) in &metrics.code_counts {
            println!("  {code}: {count}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_notify(config: &Config, text: &str) -> Result<ExitCode, Box<dyn Error>> {
    let api = ApiClient::new(&require_backend(config)?.base_url)?;
    api.send_notification(text).await?;
    println!("notification dispatched");
    Ok(ExitCode::SUCCESS)
}
