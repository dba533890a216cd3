//! CLI for sweeping invoice PDFs out of an email or saved web page.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use invsweep_core::{PdfFailurePolicy, SweepError};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, links, parse, run, Context};

/// Invoice sweep - download linked invoice PDFs and report their fields
#[derive(Parser)]
#[command(name = "invsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for downloads, parsing and renames
    #[arg(short, long, global = true, default_value = ".")]
    workdir: PathBuf,

    /// Exit without waiting for Enter
    #[arg(long, global = true)]
    no_pause: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the invoices linked from a source document, then parse them
    Run(run::RunArgs),

    /// List the download links found in a source document
    Links(links::LinksArgs),

    /// Parse invoices already in the working directory
    Parse(parse::ParseArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

impl Commands {
    fn pauses(&self) -> bool {
        matches!(self, Commands::Run(_) | Commands::Parse(_))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{} {}", style("✗").red(), e);
        return ExitCode::FAILURE;
    }

    let mut pause = false;
    let mut on_pdf_error = PdfFailurePolicy::default();
    let result = match cli.command {
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
        command => match config::load(cli.config.as_deref()) {
            Ok(sweep_config) => {
                pause = command.pauses() && sweep_config.cli.pause_on_exit && !cli.no_pause;
                on_pdf_error = sweep_config.extraction.on_pdf_error;
                let ctx = Context {
                    config: sweep_config,
                    workdir: cli.workdir,
                };
                execute(command, &ctx).await
            }
            Err(e) => Err(e),
        },
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        // Outcomes such as "no links" end the run without failing it.
        Err(e) if e
            .downcast_ref::<SweepError>()
            .is_some_and(|sweep| !sweep.is_fatal(on_pdf_error)) =>
        {
            println!("{}. Exiting.", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {:#}", style("✗").red(), e);
            ExitCode::FAILURE
        }
    };

    if pause {
        commands::wait_for_enter();
    }

    code
}

async fn execute(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::run(args, ctx).await,
        Commands::Links(args) => links::run(args, ctx),
        Commands::Parse(args) => parse::run(args, ctx),
        Commands::Config(args) => config::run(args, None),
    }
}
