//! Conversion tool check command.

use console::style;

use crate::config::Settings;

/// Printed when any conversion tool is missing. DOCX, PPTX and XLSX are
/// parsed in-process and are unaffected.
const MISSING_TOOLS_WARNING: &str = "Without these tools, PDF, legacy Word (.doc), OpenDocument, RTF, EPUB and HTML files fall back to raw byte decoding";

/// Report which conversion tools are on the PATH.
pub fn cmd_tools(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", style("Conversion tools:").bold());

    let mut missing = 0;
    for (tool, available) in settings.conversion_backend().check_tools() {
        if available {
            println!("  {} {}", style("✓").green(), tool);
        } else {
            missing += 1;
            println!("  {} {} (not found)", style("✗").red(), tool);
        }
    }

    if missing > 0 {
        println!();
        println!("{} {}", style("!").yellow(), MISSING_TOOLS_WARNING);
    }

    Ok(())
}
