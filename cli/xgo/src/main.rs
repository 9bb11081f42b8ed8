//! XGo CLI: cross-compile Go with or without CGO support.

mod commands;
mod config;

use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xgo_toolchain::{Compiler, Platform};

use config::{Settings, XgoConfig};

#[derive(Parser)]
#[command(
    name = "xgo",
    version,
    about = "Cross-compile Go with or without CGO support",
    override_usage = "xgo [OPTIONS] <gocommand> [args]..."
)]
struct Cli {
    /// Check for missing toolchains
    #[arg(short, long)]
    check: bool,
    /// Print the go command and environment instead of running it
    #[arg(short, long)]
    debug: bool,
    /// Build with garble
    #[arg(short, long)]
    garble: bool,
    /// Use zig as the cross compiler
    #[arg(short, long)]
    zig: bool,
    /// Set the GOARCH env var (useful for Windows)
    #[arg(long)]
    goarch: Option<String>,
    /// Set the GOOS env var (useful for Windows)
    #[arg(long)]
    goos: Option<String>,
    /// Disable colorized output
    #[arg(long)]
    no_color: bool,
    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
    /// Go command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = validate(&cli) {
        e.exit();
    }

    init_logging(cli.verbose, cli.no_color);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Reject flag combinations clap cannot express.
fn validate(cli: &Cli) -> Result<(), clap::Error> {
    let mut cmd = Cli::command();
    if cli.check && !cli.args.is_empty() {
        return Err(cmd.error(
            ErrorKind::ArgumentConflict,
            "--check does not take a go command",
        ));
    }
    if !cli.check && cli.args.is_empty() {
        return Err(cmd.error(
            ErrorKind::MissingRequiredArgument,
            "missing go command (e.g. build)",
        ));
    }
    Ok(())
}

fn init_logging(verbose: bool, no_color: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = match XgoConfig::find_and_load(&cwd)? {
        Some((config, dir)) => {
            debug!(dir = %dir.display(), "loaded {}", config::CONFIG_FILE);
            config
        }
        None => XgoConfig::default(),
    };

    let host = Platform::host();
    let settings = Settings::resolve(&cli, &config, &host, |name| std::env::var(name).ok());
    let table = config.table(&host.os)?;

    let mut compiler = Compiler::new(&table).with_host(host);
    compiler.debug = settings.debug;
    compiler.garble = settings.garble;
    compiler.zig = settings.zig;
    compiler.programs = config.programs();

    if settings.check {
        return commands::check::run(&compiler);
    }

    commands::build::run(&compiler, &settings.target, &settings.args)
}
