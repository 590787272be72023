use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use till_ledger::utils::time;
use till_ledger::{Config, DbService, OrderStore, SalesReporter, init_logger_with_file};

/// Inspect and maintain the till order ledger
#[derive(Parser)]
#[command(name = "till-ledger", version)]
struct Cli {
    /// SQLite database file (overrides DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print orders as JSON, newest first
    Orders(RangeArgs),
    /// Print the sales summary as JSON
    Summary(RangeArgs),
    /// Mark an order refunded
    Refund {
        order_id: String,
    },
}

/// Defaults to today in the configured zone
#[derive(Args)]
struct RangeArgs {
    /// Single day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    date: Option<NaiveDate>,
    /// First day, inclusive
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    /// Last day, inclusive
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn dates(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match (self.date, self.from, self.to) {
            (Some(date), _, _) => (date, date),
            (None, Some(from), Some(to)) => (from, to),
            _ => (today, today),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::debug!(
        db_path = %config.db_path,
        timezone = %config.timezone,
        environment = %config.environment,
        "Configuration loaded"
    );

    let db = DbService::new(&config.db_path)
        .await
        .with_context(|| format!("failed to open {}", config.db_path))?;
    let today = time::local_date(chrono::Utc::now(), config.timezone);

    match cli.command {
        Command::Orders(range) => {
            let (first, last) = range.dates(today);
            let store = OrderStore::new(db.pool.clone(), &config);
            let orders = store.find_for_dates(first, last).await?;
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
        Command::Summary(range) => {
            let (first, last) = range.dates(today);
            let reporter = SalesReporter::new(db.pool.clone(), &config);
            let summary = reporter.summarize_dates(first, last).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Refund { order_id } => {
            let store = OrderStore::new(db.pool.clone(), &config);
            store
                .refund(&order_id)
                .await
                .with_context(|| format!("refund of {order_id} failed"))?;
            println!("Order {order_id} refunded");
        }
    }

    db.pool.close().await;
    Ok(())
}
