use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Log to stderr so stdout carries only progress output.
///
/// `level` comes from the verbosity flags; RUST_LOG directives, when set,
/// refine it (e.g. `RUST_LOG=assess=trace,jujupy=debug`).
pub fn init(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
