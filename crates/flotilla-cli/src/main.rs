mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "flotilla",
    version,
    about = "Compose-style deployment manifest generator for service fleets"
)]
struct Cli {
    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a topology file into a compose-style manifest.
    Render {
        /// Path to the topology TOML file.
        topology: PathBuf,
        /// Write the manifest here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Clone every service's source repository.
    Fetch {
        /// Path to the topology TOML file.
        topology: PathBuf,
        /// Directory that receives one subdirectory per service.
        #[arg(long, default_value = ".")]
        dest: String,
        /// Forward per-service outcomes to this logging API endpoint.
        #[arg(long)]
        log_url: Option<String>,
    },
    /// Print this host's externally visible address.
    DiscoverIp {
        /// Candidate HTTP endpoints, tried in order.
        endpoints: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FLOTILLA_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Render { topology, output } => commands::render(&topology, output.as_deref()),
        Commands::Fetch {
            topology,
            dest,
            log_url,
        } => commands::fetch(&topology, &dest, log_url.as_deref()),
        Commands::DiscoverIp { endpoints } => commands::discover_ip(&endpoints),
    }
}
