//! # Voxel Field Application Entry Point
//!
//! Calls into the library's `run()` function and turns a startup failure into a
//! non-zero exit status.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_field::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
