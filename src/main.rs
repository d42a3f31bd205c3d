use clap::Parser;

use wagtail::WagtailError;
use wagtail::cli::{self, commands, output::CommandOutput, ux};
use wagtail::ledger::Ledger;


async fn run_command(command: cli::Commands) -> Result<serde_json::Value, WagtailError> {
    match command {
        cli::Commands::Setup { db, dir } => {
            let ledger = Ledger::connect(&db.db_connection_string).await?;
            tracing::info!("Connected to the database");

            let report = commands::setup(&ledger, &dir.migration_directory).await?;
            Ok(serde_json::json!(report))
        }
        cli::Commands::New { label, dir } => {
            let report = commands::new_migration(&dir.migration_directory, &label)?;
            Ok(serde_json::json!(report))
        }
        cli::Commands::Apply { count, db, dir, no_transaction, yes } => {
            if no_transaction && !yes && !ux::confirm_no_transaction() {
                tracing::info!("Aborting");
                std::process::exit(0);
            }

            let ledger = Ledger::connect(&db.db_connection_string).await?;
            tracing::info!("Connected to the database");

            let report = commands::apply(
                &ledger,
                &dir.migration_directory,
                count,
                !no_transaction,
            ).await?;
            Ok(serde_json::json!(report))
        }
    }
}


/// Entry point for the wagtail CLI.
///
/// Manages database migrations by delegating to subcommands:
/// - `setup`: Create the migration directory and the ledger table.
/// - `new`: Create a new timestamped migration file.
/// - `apply`: Apply outstanding migrations in order.
///
/// Arguments such as `--db` and `--dir` are parsed from the command line
/// (or the environment) and passed through to the command handlers.
#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    ux::setup_logging(args.verbose, args.quiet, args.json);

    let command_name = args.command.to_string();
    let result = run_command(args.command).await;

    let output = match result {
        Ok(data) => CommandOutput::success(&command_name, data),
        Err(e) => {
            tracing::error!("{e}");
            CommandOutput::failure(&command_name, &e)
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    }

    std::process::exit(output.exit_code());
}
