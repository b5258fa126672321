//! # Voxel Scanner Entry Point
//!
//! Calls into the library's `run()` function and reports any failure.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- scan.json
//! ```

fn main() {
    if let Err(err) = voxel_scanner::run() {
        eprintln!("voxel-scanner: {}", err);
        std::process::exit(1);
    }
}
