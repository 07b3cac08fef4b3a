//! Initialize command.

use console::style;

use crate::config::Settings;

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let ctx = settings.create_db_context()?;
    let applied = ctx.migrate().await?;

    if applied.is_empty() {
        println!("  {} Database already up to date", style("✓").green());
    } else {
        for name in &applied {
            println!("  {} Applied migration {}", style("✓").green(), name);
        }
    }

    println!(
        "{} Initialized docingest in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!("  Database: {}", settings.database_path().display());

    Ok(())
}
