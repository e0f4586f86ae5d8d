//! Shared helpers for command handlers.

use std::io::{self, Write};

/// What: Determine the log level from the command line and environment.
///
/// Inputs:
/// - `args`: Parsed command-line arguments
///
/// Output:
/// - Log level directive (trace, debug, info, warn, error).
///
/// Details:
/// - `--verbose` wins over `--log-level`.
/// - `LANPREFILL_TRACE=1` forces trace for chunk-level diagnostics.
pub fn determine_log_level(args: &super::Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else if std::env::var("LANPREFILL_TRACE").ok().as_deref() == Some("1") {
        "trace".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Interpret an answer to a `[Y/n]` prompt.
///
/// Output:
/// - `false` only for an explicit `n`/`no`; empty input means yes.
#[must_use]
pub fn answer_is_yes(input: &str) -> bool {
    let trimmed = input.trim();
    !(trimmed.eq_ignore_ascii_case("n") || trimmed.eq_ignore_ascii_case("no"))
}

/// What: Ask a yes/no question on stdin, defaulting to yes.
///
/// Inputs:
/// - `message`: Question without the `[Y/n]` suffix
///
/// Output:
/// - The user's answer; `true` on read errors.
pub fn prompt_user(message: &str) -> bool {
    print!("{message} [Y/n]: ");
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        answer_is_yes(&input)
    } else {
        true
    }
}
