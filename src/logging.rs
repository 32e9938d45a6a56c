use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber for the CLI.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug output and
/// `quiet` limits output to errors.
pub fn init_logging(verbose: bool, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("linepatch=debug")
        } else if quiet {
            EnvFilter::new("linepatch=error")
        } else {
            EnvFilter::new("linepatch=info")
        }
    });

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(verbose)
        .with_file(verbose)
        .with_writer(std::io::stderr);

    // A second call (e.g. from an embedding test harness) keeps the first
    // subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
