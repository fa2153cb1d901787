use anyhow::Result;
use chrono::Utc;
use indexmap::IndexMap;
use tracing::{info, warn};
use uuid::Uuid;
use weldgraph_core::domain::{Customer, OrderData, ResolutionRun, Transaction};

use crate::app::ports::{CompatibilitySource, EntityEmitterPort, ProductCatalog};
use crate::common::constants::UNKNOWN_CUSTOMER_ID;
use crate::config::ResolverConfig;
use crate::pipeline::processing::compatibility::CompatibilityIndex;
use crate::pipeline::processing::cooccurrence::{CoOccurrenceAggregator, CoOccurrenceReport};
use crate::pipeline::processing::enhance::{EnhanceReport, IntegratedUnitEnhancer};
use crate::pipeline::processing::normalize::{NormalizeReport, RawSalesLine, RecordNormalizer};
use crate::pipeline::processing::split::{OrderSplitter, SplitReport};
use crate::pipeline::processing::trinity::{TrinityBuilder, TrinityReport};

/// Aggregated reports from every stage of one resolution run.
#[derive(Debug, Default, Clone)]
pub struct ResolutionSummary {
    pub run_id: Option<Uuid>,
    pub normalize: NormalizeReport,
    pub enhance: EnhanceReport,
    pub split: SplitReport,
    pub trinity: TrinityReport,
    pub co_occurrence: CoOccurrenceReport,
    pub customers_emitted: usize,
    pub orders_emitted: usize,
    pub transactions_emitted: usize,
}

/// Use case driving the full resolution pipeline and emitting the finished
/// entity set.
///
/// The pipeline itself is a single-threaded in-memory batch computation;
/// each stage consumes the previous stage's sealed output. Only the
/// emission boundary is async.
pub struct ResolveUseCase {
    config: ResolverConfig,
    emitter: Box<dyn EntityEmitterPort>,
}

impl ResolveUseCase {
    pub fn new(config: ResolverConfig, emitter: Box<dyn EntityEmitterPort>) -> Self {
        Self { config, emitter }
    }

    /// Run the pipeline over a fully materialized raw record set.
    pub async fn resolve(
        &self,
        raw_lines: &[RawSalesLine],
        determines: &dyn CompatibilitySource,
        catalog: &dyn ProductCatalog,
    ) -> Result<ResolutionSummary> {
        let mut run = ResolutionRun {
            id: None,
            name: "resolve".to_string(),
            started_at: Utc::now(),
            finished_at: None,
        };
        self.emitter.begin_run(&mut run).await?;

        let index = CompatibilityIndex::load(determines);
        if index.is_empty() {
            warn!("compatibility index is empty; multi-power-source orders will be dropped");
        } else {
            info!(
                "loaded compatibility rules for {} power sources",
                index.powersource_count()
            );
        }

        let normalizer = RecordNormalizer::new(self.config.validate_references);
        let normalized = normalizer.normalize(raw_lines, catalog);
        info!(
            "normalized {} of {} lines into {} orders ({} invalid, {} unknown-product skips)",
            normalized.report.valid_records,
            normalized.report.total_lines,
            normalized.orders.len(),
            normalized.report.invalid_records,
            normalized.report.unknown_product_skips
        );

        let enhancer = IntegratedUnitEnhancer::from_config(&self.config);
        let enhanced = enhancer.enhance(normalized.orders);

        let splitter = OrderSplitter::new(&index);
        let split = splitter.split_all(&enhanced.orders);
        info!(
            "split produced {} orders ({} pass-through, {} sub-orders, {} dropped without power source)",
            split.orders.len(),
            split.report.pass_through_orders,
            split.report.sub_orders_emitted,
            split.report.dropped_no_powersource
        );

        let trinity = TrinityBuilder::new(catalog, &self.config).build(&split.orders);
        let co_occurrence = CoOccurrenceAggregator::aggregate(&split.orders);

        let customers = aggregate_customers(&split.orders);
        let transactions = build_transactions(&split.orders);

        // Dependency-ordered emission: each batch only references entities
        // written by an earlier batch.
        self.emitter.emit_customers(&customers).await?;
        self.emitter.emit_orders(&split.orders).await?;
        self.emitter.emit_transactions(&transactions).await?;
        self.emitter.emit_trinities(&trinity.trinities).await?;
        self.emitter.emit_co_occurrences(&co_occurrence.pairs).await?;

        run.finished_at = Some(Utc::now());
        self.emitter.finish_run(&run).await?;

        info!(
            "✅ resolution complete: {} customers, {} orders, {} trinities, {} co-occurrence pairs",
            customers.len(),
            split.orders.len(),
            trinity.trinities.len(),
            co_occurrence.pairs.len()
        );

        Ok(ResolutionSummary {
            run_id: run.id,
            normalize: normalized.report,
            enhance: enhanced.report,
            split: split.report,
            trinity: trinity.report,
            co_occurrence: co_occurrence.report,
            customers_emitted: customers.len(),
            orders_emitted: split.orders.len(),
            transactions_emitted: transactions.len(),
        })
    }
}

/// Aggregate customers over the emitted order set. Orders without a
/// customer id fall under the reserved unknown bucket so the order stream
/// stays complete.
fn aggregate_customers(orders: &[OrderData]) -> Vec<Customer> {
    let mut by_id: IndexMap<String, Customer> = IndexMap::new();
    let created_at = Utc::now();

    for order in orders {
        let customer_id = if order.customer.is_empty() {
            UNKNOWN_CUSTOMER_ID.to_string()
        } else {
            order.customer.clone()
        };
        let customer = by_id.entry(customer_id.clone()).or_insert_with(|| Customer {
            customer_id: customer_id.clone(),
            name: customer_id.clone(),
            facilities: Vec::new(),
            warehouses: Vec::new(),
            order_ids: Vec::new(),
            created_at,
        });
        if !order.facility.is_empty() && !customer.facilities.contains(&order.facility) {
            customer.facilities.push(order.facility.clone());
        }
        if !order.warehouse.is_empty() && !customer.warehouses.contains(&order.warehouse) {
            customer.warehouses.push(order.warehouse.clone());
        }
        customer.order_ids.push(order.order_id.clone());
    }

    by_id.into_values().collect()
}

/// One transaction per retained line of every emitted order.
fn build_transactions(orders: &[OrderData]) -> Vec<Transaction> {
    let created_at = Utc::now();
    let mut transactions = Vec::new();
    for order in orders {
        for (position, line) in order.line_items.iter().enumerate() {
            transactions.push(Transaction {
                transaction_id: format!("{}_L{}", order.order_id, position + 1),
                order_id: order.order_id.clone(),
                product_id: line.product_id.clone(),
                line_no: line.line_no.clone(),
                description: line.description.clone(),
                category: line.category,
                created_at,
            });
        }
    }
    transactions
}
