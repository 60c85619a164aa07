//! edgeplaced: runs the network-aware plugins outside a live orchestrator.
//!
//! Loads a cluster snapshot, topology records and a placement request from
//! JSON files, drives one scheduling cycle through the named plugin, and
//! prints the normalized scores.
//!
//! # Usage
//!
//! ```text
//! edgeplaced plugins
//! edgeplaced score --plugin NetworkOverhead \
//!     --snapshot nodes.json --topology topology.json --request pod.json
//! ```

mod dry_run;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use edgeplace_placement::Registry;

#[derive(Parser)]
#[command(name = "edgeplaced", about = "Network-aware placement dry runs")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List registered plugin names.
    Plugins,

    /// Run one scheduling cycle and print the scores.
    Score {
        /// Registered plugin name.
        #[arg(long)]
        plugin: String,

        /// Node snapshots (JSON array).
        #[arg(long)]
        snapshot: PathBuf,

        /// Topology records (JSON object or array).
        #[arg(long)]
        topology: Option<PathBuf>,

        /// Placement request (JSON object).
        #[arg(long)]
        request: PathBuf,

        /// Plugin configuration (TOML).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comma-separated candidate nodes; defaults to every node.
        #[arg(long, value_delimiter = ',')]
        candidates: Vec<String>,

        /// Cycle deadline, e.g. "5s" or "500ms".
        #[arg(long, default_value = "5s")]
        deadline: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Plugins => {
            for name in Registry::with_defaults().names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Score {
            plugin,
            snapshot,
            topology,
            request,
            config,
            candidates,
            deadline,
        } => {
            let report = dry_run::run(dry_run::ScoreArgs {
                plugin,
                snapshot,
                topology,
                request,
                config,
                candidates,
                deadline,
            })
            .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

// Logs go to stderr so stdout stays parseable.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,edgeplace=debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
