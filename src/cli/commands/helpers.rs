//! Shared helper functions for CLI commands.

use crate::config::Settings;
use crate::repository::DbContext;

/// Open the configured database, creating directories and applying
/// pending migrations.
pub async fn open_context(settings: &Settings) -> anyhow::Result<DbContext> {
    settings.ensure_directories()?;
    let ctx = settings.create_db_context()?;

    let applied = ctx.migrate().await?;
    if !applied.is_empty() {
        tracing::info!("Applied {} migration(s): {}", applied.len(), applied.join(", "));
    }

    Ok(ctx)
}

/// Truncate a string for table display.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
