use std::io::{self, BufRead, Write};


pub fn setup_logging(verbose: u8, quiet: bool, json: bool) {
    if json {
        // Mute all logging if JSON output is enabled
        tracing::subscriber::set_global_default(tracing::subscriber::NoSubscriber::default())
            .expect("Setting no-op subscriber failed");
        return;
    }

    let level = if quiet {
        tracing::Level::ERROR
    } else { match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }};

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Setting default subscriber failed!");
}


const NO_TRANSACTION_WARNING: &str =
    "Danger: running migrations without a transaction is dangerous. \
     If a migration fails when this is set, part of it may be applied but not recorded, \
     and that part may run again the next time migrations are applied, \
     leaving the database in an inconsistent state. \
     Only use this flag for migrations that do not support running in a transaction.";

/// Asks the user to confirm the --no-transaction flag on stdin.
pub fn confirm_no_transaction() -> bool {
    tracing::warn!("{NO_TRANSACTION_WARNING}");

    print!("Are you sure you want to continue? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
