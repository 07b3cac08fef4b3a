//! Web server command.

use console::style;

use crate::config::Settings;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    println!(
        "{} Starting docingest server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Database: {}", settings.database_path().display());
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, host, port).await
}
