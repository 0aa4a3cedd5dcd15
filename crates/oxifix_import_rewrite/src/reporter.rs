use std::io::{self, Write};

use colored::Colorize;
use log::debug;

use crate::types::RunSummary;

pub fn print_summary<W: Write>(
    writer: &mut W,
    summary: &RunSummary,
    elapsed_ms: u128,
    dry_run: bool,
) -> io::Result<()> {
    debug!("Printing run summary: {:?}", summary);

    let verb = if dry_run { "would be rewritten" } else { "rewritten" };
    if summary.processed == 0 {
        writeln!(writer, "\n{} No aliased imports left to rewrite.", "✓".green().bold())?;
    } else {
        writeln!(
            writer,
            "\n{} {} files {} ({} changes).",
            "✓".green().bold(),
            summary.processed.to_string().cyan(),
            verb,
            summary.changes.to_string().cyan()
        )?;
    }

    if summary.unresolved > 0 {
        writeln!(
            writer,
            "{} {} unresolved aliases left untouched.",
            "⚠".yellow().bold(),
            summary.unresolved.to_string().yellow()
        )?;
    }
    if summary.failed > 0 {
        writeln!(
            writer,
            "{} {} files could not be read or written.",
            "✗".red().bold(),
            summary.failed.to_string().red()
        )?;
    }

    writeln!(
        writer,
        "{} Finished in {}ms ({} processed, {} unchanged, {} ignored).",
        "●".bright_blue(),
        elapsed_ms.to_string().cyan(),
        summary.processed.to_string().cyan(),
        summary.unchanged.to_string().cyan(),
        summary.ignored.to_string().cyan()
    )?;
    writer.flush()?;
    Ok(())
}
