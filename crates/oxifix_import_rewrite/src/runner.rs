use anyhow::{Result, anyhow};
use log::{debug, info};
use oxifix_core::{collect_files, has_allowed_extension};
use std::io::Write;

use crate::{config::Config, logger::Logger, rewriter::Rewriter, types::RunSummary};

/// Rewrite every allowed file under the build output directory.
///
/// Configuration problems abort the run before any file is touched. Per-file
/// read/write failures are logged and counted, and the run moves on.
pub fn run_postprocess<W: Write>(mut cfg: Config, logger: &mut Logger<W>) -> Result<RunSummary> {
    info!("Starting postprocess");

    cfg.initialize()?;
    let project = cfg.project_config()?;
    let out_dir = &project.out_dir;

    if !out_dir.is_dir() {
        return Err(anyhow!("Output directory {} does not exist", out_dir.display()));
    }

    let rewriter =
        Rewriter::new(out_dir, &project.alias_map, &project.policy, &cfg.source_extension)?;

    let files = collect_files(out_dir)?;
    logger.info(format!(
        "Postprocessing {} files in {} ({} aliases, {} policy entries)",
        files.len(),
        out_dir.display(),
        project.alias_map.len(),
        project.policy.len()
    ));
    if cfg.dry_run {
        logger.info("Dry run: no files will be written");
    }

    let mut summary = RunSummary::default();
    for file in &files {
        if !has_allowed_extension(file, &cfg.extensions) {
            logger.debug(format!("Ignoring {}", file.display()));
            summary.ignored += 1;
            continue;
        }

        match rewriter.rewrite_file(file, logger, cfg.dry_run) {
            Ok(outcome) => {
                summary.unresolved += outcome.unresolved.len();
                summary.changes += outcome.changes();
                if outcome.is_changed() {
                    summary.processed += 1;
                } else {
                    summary.unchanged += 1;
                }
            }
            Err(e) => {
                logger.error(format!("{:#}", e));
                summary.failed += 1;
            }
        }
    }

    logger.info(format!(
        "Processed {} files, ignored {} files ({} unchanged, {} failed)",
        summary.processed, summary.ignored, summary.unchanged, summary.failed
    ));
    debug!("Run summary: {:?}", summary);
    Ok(summary)
}
