//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stamped_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("stamped_core ping={}", stamped_core::ping());
    println!("stamped_core version={}", stamped_core::core_version());
    println!(
        "stamped_core schema_version={}",
        stamped_core::db::migrations::latest_version()
    );
}
