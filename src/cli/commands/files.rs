//! Stored file commands.

use console::style;

use crate::config::Settings;

use super::helpers::{open_context, truncate};

/// List processed files, newest first.
pub async fn cmd_list(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_context(settings).await?;
    let processor = settings.file_processor(&ctx);
    let files = processor.list().await?;

    if files.is_empty() {
        println!("{} No files processed yet", style("!").yellow());
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "{:>6}  {:<40}  {:<6}  {}",
            "ID", "Filename", "Type", "Processed"
        ))
        .bold()
    );
    for file in &files {
        println!(
            "{:>6}  {:<40}  {:<6}  {}",
            file.id,
            truncate(&file.filename, 40),
            file.file_type,
            file.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
    println!("{} file(s)", files.len());

    Ok(())
}

/// Print the stored extraction for one file as JSON.
pub async fn cmd_show(settings: &Settings, id: i64) -> anyhow::Result<()> {
    let ctx = open_context(settings).await?;
    let processor = settings.file_processor(&ctx);

    match processor.detail(id).await? {
        Some(detail) => {
            println!("{}", serde_json::to_string_pretty(&detail)?);
            Ok(())
        }
        None => anyhow::bail!("File not found: {}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_show_unknown_id() {
        let dir = tempdir().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());

        let err = cmd_show(&settings, 42).await.unwrap_err();
        assert_eq!(err.to_string(), "File not found: 42");
    }

    #[tokio::test]
    async fn test_list_empty_database() {
        let dir = tempdir().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());

        cmd_list(&settings).await.unwrap();
        assert!(settings.database_exists());
    }
}
