use std::path::PathBuf;

use clap::Parser;

use crate::models::Ecosystem;

#[derive(Parser, Debug)]
#[command(
    name = "license-gate",
    about = "Scan dependency metadata reports and enforce license compliance policy",
    version
)]
pub struct Cli {
    /// Project path to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Policy config file [default: ./.license-gate/config.toml, fallback ~/.config/license-gate/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exclude an ecosystem from scanning (repeatable)
    #[arg(long = "exclude-ecosystem", value_name = "ECOSYSTEM")]
    pub exclude_ecosystem: Vec<EcosystemArg>,

    /// Show all dependencies (not just violations)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum EcosystemArg {
    Npm,
    Gradle,
    Maven,
    Swift,
    Pub,
}

impl From<&EcosystemArg> for Ecosystem {
    fn from(arg: &EcosystemArg) -> Self {
        match arg {
            EcosystemArg::Npm => Ecosystem::Npm,
            EcosystemArg::Gradle => Ecosystem::Gradle,
            EcosystemArg::Maven => Ecosystem::Maven,
            EcosystemArg::Swift => Ecosystem::Swift,
            EcosystemArg::Pub => Ecosystem::Pub,
        }
    }
}
