//! Build script that rebuilds the crate when the snapshot schema changes.
//!
//! `embed_migrations!` reads the migration directory at compile time, which
//! Cargo does not track on its own.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
