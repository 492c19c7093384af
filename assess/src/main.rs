#[tokio::main]
async fn main() -> eyre::Result<()> {
    use clap::Parser;

    let cli = assess::Cli::parse();

    // run with RUST_LOG="assess=debug,jujupy=debug" for per-poll details
    assess::logging::init(cli.verbose.tracing_level_filter());

    tracing::debug!(command = ?cli.command, verbose = ?cli.verbose, "starting assess");

    if assess::logged(assess::run(cli).await).is_err() {
        // already reported by `logged`
        std::process::exit(1);
    }

    Ok(())
}
