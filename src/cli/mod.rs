pub mod commands;
pub mod error;
pub mod output;
pub mod ux;

pub use clap::{Parser, Subcommand};


#[derive(Parser)]
#[command(name = "wagtail", version, about = "Wagtail is the simple, SQL-first migration runner for PostgreSQL, written in Rust.")]
pub struct Cli {
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Set level of verbosity. [default: INFO]\n\t-v: DEBUG\n\t-vv: TRACE\n--quiet takes precedence over --verbose."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Disable all information logs (only ERROR level logs are shown).\n--quiet takes precedence over --verbose."
    )]
    pub quiet: bool,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        help = "Enable JSON output format. Human readable output is disabled when this flag is set."
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser)]
pub struct DbOpts {
    #[arg(
        long = "db",
        help = "Database connection string. Please follow PostgreSQL's recommended format, e.g.:
    postgresql://<username>:<password>@<host>:<port>/<database>\n",
        env = "DB_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub db_connection_string: String,
}

#[derive(Parser)]
pub struct DirOpts {
    #[arg(
        long = "dir",
        help = "Directory containing all migration files",
        env = "MIGRATION_DIRECTORY",
    )]
    pub migration_directory: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Initialize the migration directory and the ledger table.\nSafe to run on an already initialized database.")]
    Setup {
        #[command(flatten)]
        db: DbOpts,

        #[command(flatten)]
        dir: DirOpts,
    },

    #[command(about = "Create a new migration file.
File names follow the format <YYYYMMDDHHMMSS>_<label>.sql, which keeps
migrations sorted in creation order. Use this command to create all
migration files.")]
    New {
        #[arg(help = "Label for the new migration file.")]
        label: String,

        #[command(flatten)]
        dir: DirOpts,
    },

    #[command(about = "Apply outstanding migrations in order.")]
    Apply {
        #[arg(
            value_parser = clap::value_parser!(i64).range(1..),
            help = "Number of outstanding migrations to apply. All of them when omitted."
        )]
        count: Option<i64>,

        #[command(flatten)]
        db: DbOpts,

        #[command(flatten)]
        dir: DirOpts,

        #[arg(
            long,
            action = clap::ArgAction::SetTrue,
            help = "Commit each migration on its own instead of wrapping the whole batch in a single transaction.\nOnly for migrations that cannot run inside a transaction block. Asks for confirmation."
        )]
        no_transaction: bool,

        #[arg(
            short = 'y',
            long,
            action = clap::ArgAction::SetTrue,
            help = "Skip the --no-transaction confirmation prompt."
        )]
        yes: bool,
    },
}

impl std::fmt::Display for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Commands::Setup { .. } => "setup",
            Commands::New { .. } => "new",
            Commands::Apply { .. } => "apply",
        };
        write!(f, "{name}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_parses_count_and_flags() {
        let cli = Cli::try_parse_from([
            "wagtail", "apply", "2",
            "--db", "postgresql://localhost/db",
            "--dir", "migrations",
            "--no-transaction", "-y",
        ])
        .unwrap();

        match cli.command {
            Commands::Apply { count, no_transaction, yes, .. } => {
                assert_eq!(count, Some(2));
                assert!(no_transaction);
                assert!(yes);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn apply_rejects_non_positive_count() {
        for count in ["0", "-1"] {
            let result = Cli::try_parse_from([
                "wagtail", "apply", count,
                "--db", "postgresql://localhost/db",
                "--dir", "migrations",
            ]);
            assert!(result.is_err(), "count {count} should be rejected");
        }
    }

    #[test]
    fn new_takes_label_and_directory_only() {
        let cli = Cli::try_parse_from([
            "wagtail", "new", "add_users",
            "--dir", "migrations",
        ])
        .unwrap();

        match cli.command {
            Commands::New { label, dir } => {
                assert_eq!(label, "add_users");
                assert_eq!(dir.migration_directory, "migrations");
            }
            _ => panic!("expected new"),
        }
    }

    #[test]
    fn command_names_display_correctly() {
        let cli = Cli::try_parse_from([
            "wagtail", "setup",
            "--db", "postgresql://localhost/db",
            "--dir", "migrations",
        ])
        .unwrap();
        assert_eq!(cli.command.to_string(), "setup");
    }
}
