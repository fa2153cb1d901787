use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use weldgraph_core::storage::GraphStore;
use weldgraph_core::MemoryGraphStore;
use weldgraph_resolver::app::ports::EntityEmitterPort;
use weldgraph_resolver::app::resolve_use_case::{ResolutionSummary, ResolveUseCase};
use weldgraph_resolver::config::ResolverConfig;
use weldgraph_resolver::infra::{
    read_sales_lines, FileGraphOutputAdapter, JsonDeterminesSource, JsonProductCatalog,
    StoreEmitterAdapter,
};
use weldgraph_resolver::observability::logging::init_logging;
use weldgraph_resolver::pipeline::processing::compatibility::CompatibilityIndex;
use weldgraph_resolver::pipeline::processing::enhance::IntegratedUnitEnhancer;
use weldgraph_resolver::pipeline::processing::normalize::RecordNormalizer;
use weldgraph_resolver::pipeline::processing::split::OrderSplitter;

#[derive(Parser)]
#[command(name = "weldgraph-resolver")]
#[command(about = "Order compatibility resolution and Trinity formation pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full resolution pipeline over a raw sales extract
    Resolve {
        /// JSON file with raw sales lines
        #[arg(long)]
        records: PathBuf,
        /// JSON file with DETERMINES compatibility rows
        #[arg(long)]
        determines: PathBuf,
        /// JSON file with the product catalog (gin -> display name)
        #[arg(long)]
        catalog: PathBuf,
        /// Write entity NDJSON files here instead of the in-memory store
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Optional TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep lines whose product id is absent from the catalog
        #[arg(long)]
        no_reference_validation: bool,
    },
    /// Show the split decision for a single order without emitting anything
    InspectOrder {
        #[arg(long)]
        records: PathBuf,
        #[arg(long)]
        determines: PathBuf,
        #[arg(long)]
        catalog: PathBuf,
        /// The raw order id to inspect
        #[arg(long)]
        order_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    init_logging();

    match cli.command {
        Commands::Resolve {
            records,
            determines,
            catalog,
            out_dir,
            config,
            no_reference_validation,
        } => {
            let mut resolver_config = ResolverConfig::load(config.as_deref())?;
            if no_reference_validation {
                resolver_config.validate_references = false;
            }

            let raw_lines = read_sales_lines(&records)?;
            let determines_source = JsonDeterminesSource::new(determines);
            let product_catalog = JsonProductCatalog::load_or_empty(&catalog);
            info!("product catalog holds {} entries", product_catalog.len());

            if let Some(out_dir) = out_dir {
                let emitter = FileGraphOutputAdapter::new(&out_dir)?;
                let use_case = ResolveUseCase::new(resolver_config, Box::new(emitter));
                let summary = use_case
                    .resolve(&raw_lines, &determines_source, &product_catalog)
                    .await?;
                print_summary(&summary);
                println!("✅ Entities written to {}", out_dir.display());
            } else {
                let store: Arc<dyn GraphStore> = Arc::new(MemoryGraphStore::new());
                let emitter: Box<dyn EntityEmitterPort> =
                    Box::new(StoreEmitterAdapter::new(store.clone()));
                let use_case = ResolveUseCase::new(resolver_config, emitter);
                let summary = use_case
                    .resolve(&raw_lines, &determines_source, &product_catalog)
                    .await?;
                print_summary(&summary);
                println!(
                    "✅ In-memory store holds {} orders, {} transactions, {} customers",
                    store.order_count().await?,
                    store.transaction_count().await?,
                    store.customer_count().await?
                );
            }
        }
        Commands::InspectOrder {
            records,
            determines,
            catalog,
            order_id,
        } => {
            let resolver_config = ResolverConfig::default();
            let raw_lines = read_sales_lines(&records)?;
            let determines_source = JsonDeterminesSource::new(determines);
            let product_catalog = JsonProductCatalog::load_or_empty(&catalog);

            let index = CompatibilityIndex::load(&determines_source);
            let normalizer = RecordNormalizer::new(resolver_config.validate_references);
            let normalized = normalizer.normalize(&raw_lines, &product_catalog);
            let enhancer = IntegratedUnitEnhancer::from_config(&resolver_config);
            let enhanced = enhancer.enhance(normalized.orders);

            let Some(lines) = enhanced.orders.get(&order_id) else {
                println!("Order {order_id} not found in the input extract");
                return Ok(());
            };

            let mut single = indexmap::IndexMap::new();
            single.insert(order_id.clone(), lines.clone());
            let outcome = OrderSplitter::new(&index).split_all(&single);

            println!("Order {order_id}: {} line(s)", lines.len());
            for order in &outcome.orders {
                let products: Vec<&str> = order
                    .line_items
                    .iter()
                    .map(|line| line.product_id.as_str())
                    .collect();
                println!("  -> {} [{}]", order.order_id, products.join(", "));
            }
            for skipped in &outcome.report.skipped_power_sources {
                println!(
                    "  !! power source {} skipped (missing_feeder={}, missing_cooler={})",
                    skipped.powersource_id, skipped.missing_feeder, skipped.missing_cooler
                );
            }
            if outcome.report.dropped_no_powersource > 0 {
                println!("  !! dropped: order has no power source line");
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &ResolutionSummary) {
    println!("🔄 Resolution summary");
    println!(
        "  normalize: {}/{} lines valid, {} invalid, {} unknown-product skips",
        summary.normalize.valid_records,
        summary.normalize.total_lines,
        summary.normalize.invalid_records,
        summary.normalize.unknown_product_skips
    );
    println!(
        "  enhance:   {} orders enhanced ({} feeder, {} cooler placeholders)",
        summary.enhance.orders_enhanced,
        summary.enhance.feeder_placeholders_added,
        summary.enhance.cooler_placeholders_added
    );
    println!(
        "  split:     {} pass-through, {} sub-orders from {} multi-PS orders, {} dropped, {} skipped power sources",
        summary.split.pass_through_orders,
        summary.split.sub_orders_emitted,
        summary.split.multi_powersource_orders,
        summary.split.dropped_no_powersource,
        summary.split.skipped_power_sources.len()
    );
    println!(
        "  trinity:   {} trinities from {} orders ({} non-canonical skipped)",
        summary.trinity.trinities_created,
        summary.trinity.orders_contributing,
        summary.trinity.skipped_non_canonical
    );
    println!(
        "  pairs:     {} co-occurrence pairs (max frequency {})",
        summary.co_occurrence.distinct_pairs, summary.co_occurrence.max_frequency
    );
    println!(
        "  emitted:   {} customers, {} orders, {} transactions",
        summary.customers_emitted, summary.orders_emitted, summary.transactions_emitted
    );
}
