use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::{DEFAULT_HEADING, LedgerSession};
use crate::domain::{compute_amount, format_grouped};
use crate::io::{
    ArtifactFormat, CommandShare, EXPORT_FAILED_NOTICE, Exporter, ShareTarget, finish_export,
    render, spawn_export,
};

mod console;

pub use console::{Console, ConsoleCommand};

/// Billsheet - Material Billing Sheet
#[derive(Parser)]
#[command(name = "billsheet")]
#[command(about = "An editable material billing sheet with live amounts and totals")]
#[command(version)]
pub struct Cli {
    /// Heading shown above the table and in exports
    #[arg(long, env = "BILLSHEET_HEADING", default_value = DEFAULT_HEADING, global = true)]
    pub heading: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the default sheet with its totals
    Show {
        /// Output format: table, csv, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Preview the amount for a weight and a rate (round(kgs * rs))
    Amount {
        /// Weight in kilograms (e.g., "2142" or "12.5")
        #[arg(allow_hyphen_values = true)]
        kgs: String,

        /// Rate per kilogram
        #[arg(allow_hyphen_values = true)]
        rs: String,
    },

    /// Export the default sheet to a file and share it
    Export {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Edit the sheet interactively
    Edit {
        /// Do not ask before removing rows or resetting
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Export format: table, csv, json
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Directory for exported files
    #[arg(short, long, env = "BILLSHEET_EXPORT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Program to hand exported files to (the file path is appended)
    #[arg(long, env = "BILLSHEET_SHARE_CMD")]
    pub share_cmd: Option<String>,
}

impl ExportArgs {
    pub fn exporter(&self) -> Result<Exporter> {
        let format = ArtifactFormat::parse(&self.format)?;
        Ok(Exporter::new(&self.output_dir, format))
    }

    pub fn share_target(&self) -> Result<Option<Arc<dyn ShareTarget>>> {
        let Some(command_line) = self.share_cmd.as_deref() else {
            return Ok(None);
        };
        let share = CommandShare::parse(command_line)
            .with_context(|| format!("Invalid share command '{}'", command_line))?;
        let share: Arc<dyn ShareTarget> = Arc::new(share);
        Ok(Some(share))
    }
}

impl Cli {
    /// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
    /// Logs go to stderr so they never mix with rendered tables.
    pub fn init_tracing(&self) {
        let default_directive = if self.verbose {
            "billsheet=debug"
        } else {
            "billsheet=warn"
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_directive)),
            )
            .with_writer(io::stderr)
            .init();
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Show { format } => {
                let format = ArtifactFormat::parse(&format)?;
                let session = LedgerSession::new(self.heading);
                let stdout = io::stdout();
                render(&session.snapshot(), format, stdout.lock())?;
            }

            Commands::Amount { kgs, rs } => {
                println!("{}", format_grouped(compute_amount(&kgs, &rs)));
            }

            Commands::Export { export } => {
                let exporter = export.exporter()?;
                let share = export.share_target()?;
                let session = LedgerSession::new(self.heading);

                let notice = finish_export(spawn_export(exporter, share, session.snapshot())).await;
                if notice.is_failure() {
                    bail!(EXPORT_FAILED_NOTICE);
                }
                println!("{}", notice);
            }

            Commands::Edit { yes, export } => {
                let exporter = export.exporter()?;
                let share = export.share_target()?;
                let session = LedgerSession::new(self.heading);

                let stdin = io::stdin();
                let stdout = io::stdout();
                Console::new(stdin.lock(), stdout.lock(), session, exporter)
                    .with_share(share)
                    .assume_yes(yes)
                    .run()
                    .await
                    .context("Console session failed")?;
            }
        }

        Ok(())
    }
}
