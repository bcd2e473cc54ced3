use std::io;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber; stdout is reserved for the report
///
/// `verbosity` is the number of `-v` flags. The filter is built from it
/// alone, so `RUST_LOG` has no effect.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::new(format!("session_init={}", level_for(verbosity)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
