use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use clap::{Parser, Subcommand};
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use shop_timeline::{
    config::Config,
    shop::ShopService,
    timing::{daily::{BreakInterval, Daily}, time_of_day::TimeOfDay},
    ISO_FORMAT, ISO_FORMAT_DATE,
};

#[derive(Parser)]
#[command(name = "shop-timeline", version, about = "Weekly opening hours and days off for shops")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "shop-timeline.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a shop with the default weekly schedule
    Create { title: String },
    /// Replace the schedule of one day (0 = Monday)
    Update {
        shop: i64,
        day_of_week: u8,
        /// Opening time, HH.MM or HH:MM
        from_time: String,
        /// Closing time, may be earlier than the opening time
        to_time: String,
        /// A break as FROM-TO, repeat for more
        #[arg(long = "break")]
        breaks: Vec<String>,
    },
    /// Close a shop for a range of dates
    Close {
        shop: i64,
        /// First closed date, defaults to today
        #[arg(long)]
        from: Option<String>,
        /// Last closed date, leave out to close until further notice
        #[arg(long)]
        to: Option<String>,
    },
    /// Check whether a shop is open now or at a given local time
    IsOpen {
        shop: i64,
        /// YYYY-MM-DDTHH:MM:SS in the configured timezone
        #[arg(long)]
        at: Option<String>,
    },
    /// Print the stored schedule of a shop
    Schedule { shop: i64 },
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, ISO_FORMAT_DATE)
        .with_context(|| format!("Malformed date '{}', expected YYYY-MM-DD", text))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Could not load config from {}", cli.config.display()))?;

    let manager = SqliteConnectionManager::file(&config.database_path)
        .with_init(|connection| connection.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = r2d2::Pool::builder()
        .build(manager)
        .context("Could not build the connection pool")?;
    let service = ShopService::setup(Arc::new(pool), Arc::new(config))?;

    let output = match cli.command {
        Command::Create { title } => json!(service.create_shop(&title)?),
        Command::Update {
            shop,
            day_of_week,
            from_time,
            to_time,
            breaks,
        } => {
            let opening: TimeOfDay = from_time.parse()?;
            let closing: TimeOfDay = to_time.parse()?;
            let breaks = breaks
                .iter()
                .map(|text| BreakInterval::parse(text))
                .collect::<Result<Vec<_>, _>>()?;
            let daily = Daily::new(opening, closing, breaks);
            let rows = service.update_schedule(shop, day_of_week, &daily)?;
            json!({ "updated": true, "rows": rows.len() })
        }
        Command::Close { shop, from, to } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;
            json!(service.close(shop, from, to)?)
        }
        Command::IsOpen { shop, at } => {
            let is_working = match at {
                None => service.is_working(shop)?,
                Some(at) => {
                    let local = NaiveDateTime::parse_from_str(&at, ISO_FORMAT)
                        .with_context(|| format!("Malformed time '{}', expected {}", at, ISO_FORMAT))?;
                    let timezone = service.config().timezone;
                    let instant = timezone
                        .from_local_datetime(&local)
                        .single()
                        .with_context(|| format!("{} does not exist or is ambiguous in {}", at, timezone))?;
                    service.is_working_at(shop, &instant)?
                }
            };
            json!({ "is_working": is_working })
        }
        Command::Schedule { shop } => json!({ "working_hours": service.schedule(shop)? }),
    };

    println!("{}", output);
    Ok(())
}
