//! Reporting of errors that end the process

use tracing::error;

use crate::error::PartexpError;

/// Render a fatal error for the terminal
///
/// A `PartexpError` is shown as its code plus the user message; with
/// `verbose >= 1` the source chain follows. Anything else falls back to the
/// anyhow chain.
pub fn fatal_error_message(error: &anyhow::Error, verbose: u8) -> String {
    match error.downcast_ref::<PartexpError>() {
        Some(err) => {
            let mut message = format!("[E{:04}] {}", err.code(), err.user_message());
            if verbose >= 1 {
                let mut source = std::error::Error::source(err);
                while let Some(cause) = source {
                    message.push_str(&format!("\n  caused by: {cause}"));
                    source = cause.source();
                }
            }
            message
        }
        None => format!("Error: {error:#}"),
    }
}

/// Log and print a fatal error, then exit with status 1
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("{}", fatal_error_message(&error, verbose));
    std::process::exit(1)
}
