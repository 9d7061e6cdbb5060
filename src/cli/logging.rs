use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "DOTMAN_LOG";

/// Directive used when `DOTMAN_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "dotman=debug"
    } else {
        "warn"
    }
}

/// Install a compact stderr subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
