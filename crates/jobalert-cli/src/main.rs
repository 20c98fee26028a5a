mod run;
mod schedule;
mod subscribe;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobalert")]
#[command(about = "Daily job-posting alerts matched against a skill vocabulary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once for every subscriber.
    Run {
        /// List subscribers and their throttle decision without scraping or sending mail.
        #[arg(long)]
        dry_run: bool,
    },
    /// Register a new subscriber.
    Subscribe {
        #[arg(long)]
        email: String,
        #[arg(long)]
        keywords: String,
        #[arg(long)]
        location: String,
    },
    /// Run the pipeline on a cron schedule until interrupted.
    Schedule {
        /// Six-field cron expression; defaults to `JOBALERT_SCHEDULE`.
        #[arg(long)]
        cron: Option<String>,
    },
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = jobalert_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = jobalert_db::PoolConfig::from_app_config(&config);
    let pool = jobalert_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Run { dry_run: true } => run::dry_run(&pool, run::today()).await,
        Commands::Run { dry_run: false } => {
            let summary = run::run_pipeline(&pool, &config).await?;
            run::print_summary(&summary);
            Ok(())
        }
        Commands::Subscribe {
            email,
            keywords,
            location,
        } => subscribe::subscribe(&pool, &email, &keywords, &location).await,
        Commands::Schedule { cron } => {
            let cron = cron.unwrap_or_else(|| config.schedule.clone());
            schedule::run_scheduled(pool, config, &cron).await
        }
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            jobalert_db::ping(&pool).await?;
            println!("database reachable");
            Ok(())
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = jobalert_db::run_migrations(&pool).await?;
            println!("migrations up to date ({applied} applied)");
            Ok(())
        }
    }
}
