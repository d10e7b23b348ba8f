//! BrightSign DWS CLI
//!
//! Command-line interface for managing BrightSign players through the
//! Diagnostic Web Server.

use anyhow::{Context, Result};
use brightsign_core::error::DwsError;
use brightsign_core::Credentials;
use bscli::cli::{
    generate_completion, handle_config, handle_control, handle_diag, handle_display, handle_file,
    handle_info, handle_logs, handle_registry, handle_video, Cli, Commands, OutputFormat,
};
use bscli::client::BrightSignClient;
use bscli::config::CliConfig;
use bscli::dispatch::Dispatcher;
use clap::Parser;
use std::time::Duration;

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// A follow-up suggestion for common failures
fn hint_for(error: &anyhow::Error, insecure: bool) -> Option<&'static str> {
    match error.downcast_ref::<DwsError>() {
        Some(DwsError::Status { status: 401, .. }) => {
            Some("The player rejected the credentials; check --user and --password")
        }
        Some(DwsError::Network(message)) if !insecure => {
            let message = message.to_lowercase();
            if message.contains("certificate") || message.contains("tls") {
                Some("The player uses a self-signed certificate; retry with --local")
            } else {
                None
            }
        }
        Some(e) if e.is_auth_failure() => {
            Some("Authentication could not be completed; check that --host points at the player's DWS")
        }
        _ => None,
    }
}

fn report_error(error: &anyhow::Error, format: &OutputFormat, insecure: bool, verbose: bool) {
    let hint = hint_for(error, insecure);
    match format {
        OutputFormat::Json => {
            let mut body = serde_json::json!({ "error": format!("{:#}", error) });
            if let Some(hint) = hint {
                body["hint"] = serde_json::Value::from(hint);
            }
            println!("{}", body);
        }
        OutputFormat::Table => {
            eprintln!("Error: {:#}", error);
            if let Some(hint) = hint {
                eprintln!("Hint: {}", hint);
            }
        }
    }
    if verbose {
        eprintln!("Error details: {:?}", error);
    }
}

fn connect(config: &CliConfig) -> Result<BrightSignClient> {
    let origin = config
        .origin()
        .context("No player host configured; pass --host, set BSCLI_HOST or run `bscli config set host <address>`")?;

    let password = match &config.password {
        Some(password) => password.clone(),
        None => rpassword::prompt_password(format!("Password for {}@{}: ", config.username, origin))
            .context("Failed to read password")?,
    };

    let dispatcher = Dispatcher::new(
        origin,
        Credentials::new(config.username.clone(), password),
        Duration::from_secs(config.timeout),
        config.insecure,
    )?;
    Ok(BrightSignClient::new(dispatcher))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);

    // Priority chain: CLI args → env → file → defaults. Each later layer
    // only fills values that are still unset.
    let config = match build_config(&cli, &config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            if cli.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let verbose = config.verbose;
    init_tracing(verbose);

    tracing::debug!(
        host = ?config.host,
        username = %config.username,
        format = output_format.as_str(),
        timeout = config.timeout,
        insecure = config.insecure,
        "configuration resolved"
    );

    let result = run(cli.command, &config, &config_path, &output_format).await;

    if let Err(e) = result {
        report_error(&e, &output_format, config.insecure, verbose);
        std::process::exit(1);
    }

    Ok(())
}

fn build_config(cli: &Cli, config_path: &std::path::Path) -> Result<CliConfig> {
    let mut builder = CliConfig::builder();

    if let Some(ref host) = cli.host {
        builder = builder.with_host(host)?;
    }
    if let Some(ref user) = cli.user {
        builder = builder.with_username(user)?;
    }
    if let Some(ref password) = cli.password {
        builder = builder.with_password(password);
    }
    if let Some(ref format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.with_timeout(timeout)?;
    }
    if cli.local {
        builder = builder.with_insecure(true);
    }

    builder = builder.with_env_overrides();

    if !cli.no_config {
        builder = builder.with_config_file(config_path)?;
    }

    builder.build()
}

async fn run(
    command: Commands,
    config: &CliConfig,
    config_path: &std::path::Path,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        Commands::Config { command } => handle_config(command, config, config_path, format).await,
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
        Commands::Info { command } => handle_info(&connect(config)?, command, format).await,
        Commands::Control { command } => handle_control(&connect(config)?, command, format).await,
        Commands::File { command } => handle_file(&connect(config)?, command, format).await,
        Commands::Registry { command } => {
            handle_registry(&connect(config)?, command, format).await
        }
        Commands::Logs { command } => handle_logs(&connect(config)?, command, format).await,
        Commands::Diag { command } => handle_diag(&connect(config)?, command, format).await,
        Commands::Display { command } => handle_display(&connect(config)?, command, format).await,
        Commands::Video { command } => handle_video(&connect(config)?, command, format).await,
    }
}
