// Library root
// -----------
// The binary (`main.rs`) parses arguments and wires these modules together;
// everything that decides what gets uploaded, when, and how results are
// counted lives here so it can be tested without a network or a terminal.
//
// Module responsibilities:
// - `scan`: finds the photos in a directory, in a stable order.
// - `select`: picks each iteration's batch (sequential cursor or random).
// - `pacing`: iteration budget and the sleep between iterations.
// - `driver`: the run loop and its success/failure accounting.
// - `api`: HTTP upload client (multipart POST with an API key header).
// - `upload`: the `Uploader` trait the driver calls, and `UploadOutcome`.
// - `report`: terminal output and the start confirmation.
// - `interrupt`: Ctrl+C handling.
// - `config` / `cli`: settings and command-line definition.
pub mod api;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod interrupt;
pub mod pacing;
pub mod report;
pub mod scan;
pub mod select;
pub mod upload;

pub use error::{Result, UploaderError};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins when set; otherwise
/// only warnings, or debug output for this crate with `verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,photo_batch_uploader=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
