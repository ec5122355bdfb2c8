use std::io;

use tracing::Level;

/// Map repeated `-v` flags to a log level. Warnings are always shown.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize a compact tracing subscriber writing to stderr, so stdout
/// stays free for rendered documents. Safe to call multiple times;
/// subsequent calls are no-ops for the global subscriber.
pub fn init_default(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .compact()
        .try_init();
}
