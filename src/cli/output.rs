//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Cyan: hints
//! - Bold: headers
//! - Dimmed: secondary info

use console::style;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err() && console::colors_enabled()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ dropped api-key for test1`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ secret not found`
pub fn error(msg: &str) {
    if std::env::var("NO_COLOR").is_err() && console::colors_enabled_stderr() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a hint message (cyan).
///
/// Example: `→ export GITHUB_TOKEN first`
pub fn hint(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        println!("→ {}", msg);
    }
}

/// Print a bold section header.
///
/// Example: `Members:`
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a list item with bullet.
///
/// Example: `  • test1 (Test 1)`
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a dimmed/secondary message.
///
/// Example: `no secrets dropped for you`
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}
