use std::process::ExitCode;

use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use wif_core::{Mode, UpdateOptions};
use wif_gcp::{GcpApi, GcpClient, GcpConfig};
use wif_ocm::{OcmClient, OcmConfig};
use wif_provisioner::{ErrorKind, Outcome, WifError};

mod cli;
mod config;

use cli::{Cli, Command, UpdateCommand, UpdateWifConfigArgs};
use config::CliConfig;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = <Cli as clap::Parser>::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Update(UpdateCommand::WifConfig(args)) => update_wif_config(args).await,
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn update_wif_config(args: UpdateWifConfigArgs) -> Result<ExitCode> {
    let cfg = CliConfig::from_env()?;
    let mode = Mode::from(args.mode);

    let cwd = std::env::current_dir().wrap_err("failed to read current directory")?;
    let home = dirs::home_dir();
    let target_dir = config::resolve_output_dir(&args.output_dir, &cwd, home.as_deref())?;

    let mut opts = UpdateOptions::new(args.key, mode, target_dir);
    if let Some(version) = args.version {
        opts = opts.with_version(version);
    }

    let ocm = OcmClient::new(OcmConfig {
        base_url: cfg.ocm_url.clone(),
        token: cfg.ocm_token.clone(),
        timeout: cfg.timeout,
    })
    .wrap_err("failed to build OCM client")?;

    let gcp = match cfg.gcp_token_for(mode)? {
        Some(token) => Some(
            GcpClient::new(GcpConfig::new(token, cfg.timeout))
                .wrap_err("failed to build GCP client")?,
        ),
        None => None,
    };

    tracing::info!(key = %opts.key, mode = %opts.mode, version = ?opts.version, "updating wif-config");

    let outcome =
        match wif_provisioner::run(&opts, &ocm, gcp.as_ref().map(|c| c as &dyn GcpApi)).await {
            Ok(outcome) => outcome,
            Err(e) => return Ok(report_failure(e)),
        };

    match outcome {
        Outcome::ScriptsWritten { paths } => {
            println!("Scripts written to {}", opts.target_dir.display());
            for path in paths {
                println!("  {}", path.display());
            }
        }
        Outcome::Reconciled { steps } => {
            tracing::info!(steps = steps.len(), "wif-config reconciled");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Print the failure with its full cause chain and pick the exit code.
fn report_failure(e: WifError) -> ExitCode {
    let kind = e.kind();
    tracing::error!(kind = kind_label(kind), step = e.failed_step(), "wif-config update failed");
    let report =
        eyre::Report::new(e).wrap_err(format!("wif-config update failed ({})", kind_label(kind)));
    eprintln!("Error: {report:?}");
    ExitCode::from(exit_code(kind))
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "not found",
        ErrorKind::InvalidInput => "invalid input",
        ErrorKind::UpstreamFailure => "upstream failure",
        ErrorKind::IoFailure => "i/o failure",
    }
}

/// 1 is left to eyre for setup failures before the pass starts.
fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidInput => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::UpstreamFailure => 4,
        ErrorKind::IoFailure => 5,
    }
}
