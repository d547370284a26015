//! CLI config check
//!
//! Prints the effective configuration (secrets masked) and every validation
//! finding.

use captionforge_config::{validate, RelayConfig};

/// Returns `false` when the config has errors.
pub fn run(config: &RelayConfig) -> bool {
    println!("\n🔍 captionforge configuration\n");
    match serde_json::to_string_pretty(&config.redacted()) {
        Ok(text) => println!("{text}"),
        Err(e) => println!("  (could not render config: {e})"),
    }

    let report = validate(config);
    println!();
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }

    println!();
    if report.is_valid() {
        println!("✅ Configuration is usable.");
    } else {
        println!("❌ Configuration has {} error(s).", report.errors.len());
    }
    report.is_valid()
}
