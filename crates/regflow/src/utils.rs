use colored::Colorize;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Log to stdout, `info` unless RUST_LOG says otherwise
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(std::io::stdout)
        .init();
}

/// Tell the user whether this run changes anything
pub fn print_run_mode(apply_changes: bool) {
    if apply_changes {
        println!("{}", "Applying changes to provider registrations.".cyan());
    } else {
        println!(
            "{}",
            "Dry run: changes are only reported. Pass --apply-changes to apply them.".yellow()
        );
    }
}
