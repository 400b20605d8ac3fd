use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use order_fulfillment::application::processor::OrderProcessor;
use order_fulfillment::application::purchase::PurchaseRules;
use order_fulfillment::domain::ports::{ClockBox, OrderStore, ProductStore};
use order_fulfillment::infrastructure::clock::{FixedClock, SystemClock};
use order_fulfillment::infrastructure::in_memory::InMemoryCatalog;
#[cfg(feature = "storage-rocksdb")]
use order_fulfillment::infrastructure::rocksdb::RocksDBStore;
use order_fulfillment::infrastructure::notifications::TracingNotifier;
use order_fulfillment::interfaces::csv::catalog_reader::CatalogReader;
use order_fulfillment::interfaces::csv::product_writer::ProductWriter;
use order_fulfillment::interfaces::csv::seed::{import_orders, import_products};
use order_fulfillment::interfaces::http;
use order_fulfillment::telemetry;
use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "FULFILLMENT_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Products CSV to import before running
    #[arg(long, global = true)]
    products: Option<PathBuf>,

    /// Orders CSV (`order_id,product_id` rows) to import before running
    #[arg(long, global = true)]
    orders: Option<PathBuf>,

    /// Pin today's date (YYYY-MM-DD) instead of reading the system clock
    #[arg(long, global = true, env = "FULFILLMENT_TODAY")]
    today: Option<NaiveDate>,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "FULFILLMENT_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "FULFILLMENT_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
    /// Process one order and print the resulting product table as CSV
    Process { order_id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    dispatch(cli).await
}

#[cfg(feature = "storage-rocksdb")]
async fn dispatch(cli: Cli) -> Result<()> {
    match cli.db_path.clone() {
        Some(db_path) => {
            let store = RocksDBStore::open(&db_path).into_diagnostic()?;
            tracing::info!(path = %db_path.display(), "using RocksDB storage");
            run(store, cli).await
        }
        None => run(InMemoryCatalog::new(), cli).await,
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
async fn dispatch(cli: Cli) -> Result<()> {
    if cli.db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    run(InMemoryCatalog::new(), cli).await
}

async fn run<S>(store: S, cli: Cli) -> Result<()>
where
    S: ProductStore + OrderStore + Clone + 'static,
{
    if let Some(path) = &cli.products {
        let reader = CatalogReader::new(File::open(path).into_diagnostic()?);
        let count = import_products(&store, reader).await.into_diagnostic()?;
        tracing::info!(count, path = %path.display(), "imported products");
    }
    if let Some(path) = &cli.orders {
        let reader = CatalogReader::new(File::open(path).into_diagnostic()?);
        let count = import_orders(&store, reader).await.into_diagnostic()?;
        tracing::info!(count, path = %path.display(), "imported orders");
    }

    let clock: ClockBox = match cli.today {
        Some(today) => Box::new(FixedClock::new(today)),
        None => Box::new(SystemClock),
    };
    let rules = PurchaseRules::new(Box::new(store.clone()), Box::new(TracingNotifier), clock);
    let processor = OrderProcessor::new(Box::new(store.clone()), rules);

    match cli.command {
        Command::Serve { bind } => {
            let app = http::router(Arc::new(processor));
            let listener = tokio::net::TcpListener::bind(bind).await.into_diagnostic()?;
            tracing::info!(address = %listener.local_addr().into_diagnostic()?, "listening");
            axum::serve(listener, app).await.into_diagnostic()?;
        }
        Command::Process { order_id } => {
            let id = processor.process_order(order_id).await.into_diagnostic()?;
            tracing::info!(order_id = id, "order processed");

            let products = ProductStore::all(&store).await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = ProductWriter::new(stdout.lock());
            writer.write_products(products).into_diagnostic()?;
        }
    }

    Ok(())
}
