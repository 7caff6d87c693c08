use clap::{Args, Parser, Subcommand, ValueEnum};

use wif_core::Mode;

/// Manage workload identity federation configs of OpenShift Dedicated clusters on GCP.
#[derive(Debug, Parser)]
#[command(author, version, bin_name = "ocm-wif")]
pub struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Update resources.
    #[command(subcommand)]
    Update(UpdateCommand),
}

#[derive(Debug, Subcommand)]
pub enum UpdateCommand {
    /// Update a wif-config and bring its GCP resources in line.
    WifConfig(UpdateWifConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct UpdateWifConfigArgs {
    /// ID or display name of the wif-config.
    #[arg(value_name = "ID|NAME")]
    pub key: String,

    /// How to apply cloud changes.
    #[arg(long, short = 'm', value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,

    /// Directory for the manual-mode scripts.
    #[arg(long = "output-dir", short = 'o', default_value = "")]
    pub output_dir: String,

    /// OpenShift version whose template should be attached, e.g. 4.17.
    #[arg(long)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ModeArg {
    Auto,
    Manual,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => Mode::Auto,
            ModeArg::Manual => Mode::Manual,
        }
    }
}
