//! Point d'entrée CLI pour geoaxe

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use geoaxe_cli::cli::{self, Commands};
use geoaxe_cli::DecodeStatus;

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Décoder les géométries du réseau ferroviaire vers WGS84
#[derive(Parser)]
#[command(name = "geoaxe")]
#[command(author, version)]
#[command(about = "Décoder les géométries exportées de la base vers GeoJSON, WKT ou EWKB (WGS84)")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let report = match cli.command {
        Commands::Sniff { input } => {
            info!(input = %input.display(), "Sniff");
            return cli::cmd_sniff(&input);
        }
        Commands::Points(args) => {
            info!(input = %args.input.display(), output = %args.output.display(), "Decode points");
            cli::cmd_points(&args)?
        }
        Commands::Axes(args) => {
            info!(input = %args.input.display(), output = %args.output.display(), "Assemble axes");
            cli::cmd_axes(&args)?
        }
    };

    if !cli.quiet {
        report.display();
    }
    info!("{}", report.summary());

    if report.status == DecodeStatus::Failed {
        anyhow::bail!("Nothing could be decoded from {}", report.input);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
