use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use oxifix_import_rewrite::{Config, Logger};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxifix")]
#[command(about = "Build output fixups for JavaScript/TypeScript projects", long_about = None)]
struct Cli {
    /// Print debug-level progress output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rewrite path-aliased imports in build output into relative paths
    Postprocess(Config),
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let mut logger = Logger::new(stdout, cli.debug);
    let start = Instant::now();

    match cli.command {
        Commands::Postprocess(cfg) => {
            info!("Running postprocess (extensions: {:?})", cfg.extensions);
            let dry_run = cfg.dry_run;

            let result = oxifix_import_rewrite::run_postprocess(cfg, &mut logger);
            let summary = match result {
                Ok(summary) => summary,
                Err(e) => {
                    logger.writer_mut().flush()?;
                    return Err(e);
                }
            };
            debug!("Run finished with {} warnings", logger.warnings());

            let elapsed_ms = start.elapsed().as_millis();
            oxifix_import_rewrite::print_summary(
                logger.writer_mut(),
                &summary,
                elapsed_ms,
                dry_run,
            )?;

            // Per-file warnings and failures do not change the exit status
            Ok(())
        }
    }
}
