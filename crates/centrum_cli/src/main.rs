//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `centrum_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("centrum_core version={}", centrum_core::core_version());
    for module in &centrum_core::MODULES {
        println!(
            "module id={} name={} logo={}",
            module.id, module.name, module.logo
        );
    }
}
