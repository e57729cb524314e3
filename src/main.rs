use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commitment_recovery::{RecoverOptions, RecoveryConfig};

#[derive(Parser)]
#[command(name = "commitment-recovery")]
#[command(about = "Replay your commit timestamps from one repository into a fresh one")]
struct Cli {
    /// Path of the source repository
    #[arg(short, long)]
    source: String,

    /// Where to create the target repository (default: <source>-commitment-recovery-<date>)
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Comma-separated author emails to keep (default: git config user.email)
    #[arg(
        short,
        long = "email_filters",
        visible_alias = "email-filters",
        value_delimiter = ','
    )]
    email_filters: Option<Vec<String>>,

    /// Do not copy commit messages or source hashes into the target repository
    #[arg(
        short = 'm',
        long = "hide_message",
        visible_alias = "hide-message",
        overrides_with = "show_message"
    )]
    hide_message: bool,

    /// Copy commit messages even if the config file sets `hide_message`
    #[arg(
        long = "show_message",
        visible_alias = "show-message",
        overrides_with = "hide_message"
    )]
    show_message: bool,

    /// TOML file with defaults for the options above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default branch of the target repository (default: main)
    #[arg(long)]
    branch: Option<String>,

    /// File each replayed commit appends to (default: README.md)
    #[arg(long)]
    artifact: Option<String>,
}

impl Cli {
    fn into_options(self, config: RecoveryConfig) -> RecoverOptions {
        RecoverOptions {
            target: self.target,
            email_filters: self.email_filters.or_else(|| config.email_filters.clone()),
            hide_message: !self.show_message && (self.hide_message || config.hide_message),
            branch: self.branch.unwrap_or_else(|| config.branch().to_string()),
            artifact: self.artifact.unwrap_or_else(|| config.artifact().to_string()),
            ..RecoverOptions::new(self.source)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RecoveryConfig::load(path)?,
        None => RecoveryConfig::default(),
    };
    let options = cli.into_options(config);

    match commitment_recovery::recover(&options) {
        Ok(summary) => {
            println!(
                "Replayed {} of {} commits into {}",
                summary.replayed,
                summary.scanned,
                summary.target.display()
            );
            Ok(())
        }
        Err(e) if e.is_diagnostic() => {
            eprintln!("{:#}", anyhow::Error::from(e));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
