//! Terminal markers for the end-of-run summary.

use console::Style;

/// Report-written line: green check.
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Fatal failure (e.g. head revision unavailable): red cross.
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Swallowed svn query failures: yellow warning sign.
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Scan statistics, rendered dim under the success line.
pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}
