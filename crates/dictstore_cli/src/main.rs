//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `dictstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use dictstore_core::db::migrations::latest_version;
use dictstore_core::db::open_db_in_memory;

fn main() {
    println!("dictstore_core version={}", dictstore_core::core_version());

    match open_db_in_memory() {
        Ok(_conn) => {
            println!("dictstore_core schema_version={}", latest_version());
        }
        Err(err) => {
            eprintln!("dictstore_core db_open failed: {err}");
            std::process::exit(1);
        }
    }
}
