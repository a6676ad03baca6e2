//! CLI administration tool for shortlinks.
//!
//! Creates, resolves and lists short links directly against the database,
//! without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Create a link with a generated alias
//! cargo run --bin admin -- create https://example.com/some/long/path
//!
//! # Create a link with a custom alias
//! cargo run --bin admin -- create https://example.com/docs --alias docs
//!
//! # Resolve an alias (counts a visit)
//! cargo run --bin admin -- resolve docs
//!
//! # Show a link without counting a visit
//! cargo run --bin admin -- show docs
//!
//! # List links
//! cargo run --bin admin -- latest -n 20
//! cargo run --bin admin -- popular
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Uses the same configuration as the server; `DATABASE_URL` (or the `DB_*`
//! components) is required.

use shortlinks::application::services::LinkService;
use shortlinks::config::{self, Config, mask_connection_string};
use shortlinks::domain::entities::LinkRecord;
use shortlinks::infrastructure::persistence::PgLinkRepository;
use shortlinks::routes::RESERVED_ALIASES;
use shortlinks::utils::alias_generator::RandomAliasGenerator;
use shortlinks::utils::base_url::short_url;
use shortlinks::utils::relative_time;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlinks.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// Target URL (http or https)
        url: String,

        /// Custom alias (letters, digits and dashes)
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Resolve an alias to its URL and count a visit
    Resolve { alias: String },

    /// Show a link without counting a visit
    Show { alias: String },

    /// List the most recently created links
    Latest {
        /// Number of links to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// List the most visited links
    Popular {
        /// Number of links to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

type PgLinkService = LinkService<PgLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(database_url)
            )
        })?;

    let service = build_service(&config, pool.clone());
    let base_url = config.public_base_url.as_deref().unwrap_or("/");

    match cli.command {
        Commands::Create { url, alias } => create_link(&service, &url, alias, base_url).await?,
        Commands::Resolve { alias } => {
            let url = service.resolve_link(&alias).await?;
            println!("{}", url.bright_white());
        }
        Commands::Show { alias } => {
            let record = service.get_link(&alias).await?;
            print_link(&record, base_url);
        }
        Commands::Latest { limit } => {
            println!("{}", "🕒 Latest links".bright_blue().bold());
            println!();
            print_table(&service.list_latest(limit).await?);
        }
        Commands::Popular { limit } => {
            println!("{}", "🔥 Most visited links".bright_blue().bold());
            println!();
            print_table(&service.list_most_visited(limit).await?);
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn build_service(config: &Config, pool: PgPool) -> PgLinkService {
    let repository = PgLinkRepository::with_timeout(Arc::new(pool), config.storage_timeout());

    LinkService::new(
        Arc::new(repository),
        Arc::new(RandomAliasGenerator::new(config.alias_length)),
        config.alias_max_attempts,
    )
    .with_reserved_aliases(RESERVED_ALIASES)
}

/// Creates a link; an empty `--alias` requests a generated one.
async fn create_link(
    service: &PgLinkService,
    url: &str,
    alias: Option<String>,
    base_url: &str,
) -> Result<()> {
    let alias = alias.filter(|a| !a.is_empty());
    let record = service.create_link(url, alias.as_deref()).await?;

    println!("{}", "✅ Short link created".green().bold());
    println!();
    print_link(&record, base_url);

    Ok(())
}

fn print_link(record: &LinkRecord, base_url: &str) {
    println!("  Alias:   {}", record.alias.cyan());
    println!("  Short:   {}", short_url(base_url, &record.alias).bright_yellow());
    println!("  URL:     {}", record.url.bright_white());
    println!("  Visits:  {}", record.visits.to_string().bright_green());
    println!(
        "  Created: {} ({})",
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black(),
        relative_time::since(record.created_at)
    );
}

/// Prints links as a table.
///
/// # Output Format
///
/// ```text
///   Alias        Visits   Created          URL
///   ─────────────────────────────────────────────────────────────────
///   docs         42       3 minutes ago    https://example.com/docs
/// ```
fn print_table(records: &[LinkRecord]) {
    if records.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return;
    }

    println!(
        "  {:<12} {:<8} {:<16} {}",
        "Alias".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in records {
        println!(
            "  {:<12} {:<8} {:<16} {}",
            record.alias.cyan(),
            record.visits.to_string().bright_green(),
            relative_time::since(record.created_at).bright_black(),
            record.url
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await
                .context("Failed to count links, have migrations been applied?")?;

            let visits_count: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(visits), 0)::BIGINT FROM links")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Visits:     {}",
                visits_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
