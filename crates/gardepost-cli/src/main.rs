use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc, Weekday};
use clap::{Parser, Subcommand};
use tracing::info;

use gardepost_core::config::GardepostConfig;
use gardepost_core::types::OperatorContext;
use gardepost_duty::{DutyFeedClient, RadiusResolver};
use gardepost_facebook::FacebookClient;
use gardepost_geocode::GeocodeClient;
use gardepost_render::PdfConverter;
use gardepost_scheduler::{LifecycleController, Orchestrator, Platform};
use gardepost_store::{MessageStore, PharmacyDraft, PharmacyStore, PostStore};

#[derive(Parser)]
#[command(name = "gardepost", about = "Recurring pharmacy duty-roster posts for Facebook pages")]
struct Cli {
    /// Path to gardepost.toml (defaults to ~/.gardepost/gardepost.toml).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a generation batch over every registered pharmacy.
    Generate {
        /// Reference start date (YYYY-MM-DD) the run schedules from.
        #[arg(long)]
        start_date: NaiveDate,
    },
    /// Inspect and administer recorded posts.
    Posts {
        #[command(subcommand)]
        command: PostsCommand,
    },
    /// Manage registered pharmacies.
    Pharmacies {
        #[command(subcommand)]
        command: PharmaciesCommand,
    },
    /// Read or replace the shared post message.
    Message {
        #[command(subcommand)]
        command: MessageCommand,
    },
}

#[derive(Subcommand)]
enum PostsCommand {
    /// List every post with its derived display status.
    List,
    /// Publish a scheduled post immediately.
    ForcePublish { id: String },
    /// Cancel a scheduled post (deletes the remote post first).
    Cancel { id: String },
    /// Delete every local post record.
    DeleteAll,
}

#[derive(Subcommand)]
enum PharmaciesCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        /// Weekday the recurring post lands on (e.g. "monday").
        #[arg(long)]
        posting_day: String,
        /// "weekly" or "biweekly".
        #[arg(long, default_value = "weekly")]
        frequency: String,
        /// "boolean" or "threshold".
        #[arg(long, default_value = "threshold")]
        api_mode: String,
        #[arg(long)]
        facebook_page_id: Option<String>,
        /// Initial search radius in kilometres.
        #[arg(long)]
        radius_km: Option<u32>,
        #[arg(long)]
        latitude: Option<f64>,
        #[arg(long)]
        longitude: Option<f64>,
        #[arg(long)]
        duty_api_token: String,
        #[arg(long)]
        page_access_token: String,
    },
    List,
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum MessageCommand {
    Get,
    Set { message: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gardepost=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: explicit flag > GARDEPOST_CONFIG env > ~/.gardepost/gardepost.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("GARDEPOST_CONFIG").ok());
    let config = GardepostConfig::load(config_path.as_deref()).context("loading config")?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    gardepost_store::db::init_db(&db)?;

    // each store gets its own connection for thread safety
    let pharmacies = Arc::new(PharmacyStore::new(rusqlite::Connection::open(db_path)?));
    let posts = Arc::new(PostStore::new(rusqlite::Connection::open(db_path)?));
    let messages = Arc::new(MessageStore::new(db));

    let operator = OperatorContext::new(
        "cli",
        std::env::var("USER").unwrap_or_else(|_| "operator".into()),
    );

    let platform: Arc<dyn Platform> =
        Arc::new(FacebookClient::new(config.facebook.graph_url.clone()));

    match cli.command {
        Command::Generate { start_date } => {
            let geocoder = GeocodeClient::new(
                config.geocoding.base_url.clone(),
                config.geocoding.api_key.clone(),
            );
            let feed = DutyFeedClient::new(
                config.duty_feed.base_url.clone(),
                config.duty_feed.report_language.clone(),
                config.artifacts.pdf_dir.clone(),
            );
            let resolver = RadiusResolver::new(Box::new(feed));
            let converter = PdfConverter::new(config.artifacts.png_dir.clone());

            let orchestrator = Orchestrator::new(
                pharmacies,
                posts,
                messages,
                Box::new(geocoder),
                Box::new(resolver),
                Box::new(converter),
                platform,
            );

            let report = orchestrator
                .generate(start_date, Utc::now(), &operator)
                .await?;
            info!(
                scheduled = report.scheduled(),
                skipped = report.skipped(),
                failed = report.failed(),
                "generation run finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Posts { command } => {
            let lifecycle = LifecycleController::new(pharmacies, posts, messages, platform);
            match command {
                PostsCommand::List => {
                    let views = lifecycle.list(Utc::now())?;
                    println!("{}", serde_json::to_string_pretty(&views)?);
                }
                PostsCommand::ForcePublish { id } => {
                    let fb_post_id = lifecycle.force_publish(&id, &operator).await?;
                    println!("published as {fb_post_id}");
                }
                PostsCommand::Cancel { id } => {
                    lifecycle.cancel(&id, &operator).await?;
                    println!("cancelled");
                }
                PostsCommand::DeleteAll => {
                    let count = lifecycle.delete_all(&operator)?;
                    println!("deleted {count} posts");
                }
            }
        }

        Command::Pharmacies { command } => match command {
            PharmaciesCommand::Add {
                name,
                address,
                posting_day,
                frequency,
                api_mode,
                facebook_page_id,
                radius_km,
                latitude,
                longitude,
                duty_api_token,
                page_access_token,
            } => {
                let posting_day: Weekday = posting_day
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid weekday: {posting_day}"))?;
                let posting_frequency = frequency
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
                let api_mode = api_mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;

                let pharmacy = pharmacies.add(PharmacyDraft {
                    name,
                    facebook_page_id,
                    posting_day,
                    posting_frequency,
                    address,
                    latitude,
                    longitude,
                    radius_km,
                    api_mode,
                    duty_api_token,
                    page_access_token,
                })?;
                println!("added pharmacy {}", pharmacy.id);
            }
            PharmaciesCommand::List => {
                let list = pharmacies.list()?;
                println!("{}", serde_json::to_string_pretty(&list)?);
            }
            PharmaciesCommand::Delete { id } => {
                pharmacies.delete(&id)?;
                println!("deleted");
            }
        },

        Command::Message { command } => match command {
            MessageCommand::Get => match messages.get()? {
                Some(message) => println!("{message}"),
                None => println!("(no post message configured)"),
            },
            MessageCommand::Set { message } => {
                messages.set(&message)?;
                println!("message saved");
            }
        },
    }

    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
