mod crawl;
mod report;
mod schedule;

use clap::{Parser, Subcommand};
use endsig_core::Environment;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "endsig-cli")]
#[command(about = "Ending Signal: webtoon completion tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every enabled source, reconcile statuses and notify subscribers
    Crawl {
        /// Restrict the run to one source (e.g. `naver_webtoon`)
        #[arg(long)]
        source: Option<String>,
    },
    /// Consolidated admin report over pending run reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run `crawl` and `report send` on their cron schedules until interrupted
    Schedule,
}

#[derive(Debug, Subcommand)]
enum ReportCommands {
    /// Email all pending run reports to `ADMIN_EMAIL`, then clear them
    Send,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = endsig_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(colored_logs(&config.env))
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("endsig-cli ready; see --help for commands");
        return Ok(());
    };

    let pool = endsig_db::connect_pool_from_config(&config).await?;

    match command {
        Commands::Crawl { source } => crawl::run_crawl(&pool, &config, source.as_deref()).await,
        Commands::Report {
            command: ReportCommands::Send,
        } => report::run_report_send(&pool, &config).await,
        Commands::Db { command } => run_db_command(&pool, command).await,
        Commands::Schedule => schedule::run_scheduler(pool, config).await,
    }
}

/// No ANSI escapes in production logs.
fn colored_logs(env: &Environment) -> bool {
    !matches!(env, Environment::Production)
}

async fn run_db_command(pool: &sqlx::PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            endsig_db::ping(pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = endsig_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
