use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use sea_orm::Database;

#[derive(Clone, ValueEnum)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back the last applied migration
    Down,
    /// Drop everything and re-apply from scratch
    Fresh,
    /// Show applied / pending migrations
    Status,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Billfold database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let command = match args.command {
        Command::Up => MigrationCommand::Up,
        Command::Down => MigrationCommand::Down,
        Command::Fresh => MigrationCommand::Fresh,
        Command::Status => MigrationCommand::Status,
    };

    if let Err(e) = migrate(&db, command).await {
        eprintln!("migration failed: {e}");
        std::process::exit(1);
    }
}
