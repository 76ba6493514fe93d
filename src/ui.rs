//! Formatting helpers for terminal output.

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display the configured modules and their base versions.
pub fn display_modules(modules: &[(String, String)]) {
    println!("\x1b[1mConfigured modules:\x1b[0m");
    for (key, version) in modules {
        println!("  - {} ({})", key, version);
    }
}
