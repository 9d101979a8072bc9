pub mod args;

pub use args::run;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber, honouring `RUST_LOG` (default `warn`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
