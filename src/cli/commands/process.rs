//! Process command.

use std::path::{Path, PathBuf};

use console::style;

use crate::config::Settings;
use crate::models::ProcessResult;
use crate::services::FileProcessor;

use super::helpers::open_context;

/// Run files through the ingestion pipeline.
pub async fn cmd_process(settings: &Settings, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let ctx = open_context(settings).await?;
    let processor = settings.file_processor(&ctx);

    let mut failed = 0;
    for path in files {
        match process_path(&processor, path).await {
            Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
            Ok(result) => print_summary(&result),
            Err(e) => {
                failed += 1;
                eprintln!("  {} {}: {}", style("✗").red(), path.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, files.len());
    }
    Ok(())
}

async fn process_path(processor: &FileProcessor, path: &Path) -> anyhow::Result<ProcessResult> {
    let content = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(processor.process(content, &filename).await?)
}

fn print_summary(result: &ProcessResult) {
    match result {
        ProcessResult::Processed {
            data, file_type, ..
        } => {
            println!(
                "  {} {} ({}, {}): {} entities, {} sections",
                style("✓").green(),
                result.filename(),
                file_type,
                data.metadata.source.as_str(),
                data.statistics.total_entities,
                data.statistics.total_sections
            );
            if let Some(ref error) = data.metadata.error {
                println!("    {} {}", style("!").yellow(), error);
            }
        }
        ProcessResult::AlreadyAvailable { created_at, .. } => {
            println!(
                "  {} {} already processed at {}",
                style("=").cyan(),
                result.filename(),
                created_at
            );
        }
    }
    println!("    {}", style(result.file_hash()).dim());
}
