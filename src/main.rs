use clap::Parser;
use partexp::cli::{execute_command, get_log_level, handle_fatal_error, Cli};
use tracing::{debug, trace};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(get_log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("partexp started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let verbose = cli.verbose;
    if let Err(e) = execute_command(cli).await {
        handle_fatal_error(e, verbose);
    }
}
