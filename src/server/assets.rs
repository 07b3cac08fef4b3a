//! Static asset constants (HTML, CSS and JavaScript).

/// Upload page served at `/`.
pub const INDEX_HTML: &str = include_str!("static/index.html");

/// Stylesheet for the web interface.
pub const CSS: &str = include_str!("static/style.css");

/// JavaScript for uploads and the file listing.
pub const JS: &str = include_str!("static/app.js");
