//! Log setup for the harness binary

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a compact stderr subscriber for the harness binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` switches this crate from
/// `info` to `debug`.
pub fn init_cli_logger(verbose: bool) {
    let fallback = if verbose { "scratchpad=debug,info" } else { "scratchpad=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
