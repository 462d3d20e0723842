use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` enables debug and `-vv` trace for
/// the orchestrator crates, and warnings only are shown by default.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "warn,build_orchestrator=debug,orchestrate=debug",
        _ => "warn,build_orchestrator=trace,orchestrate=trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
