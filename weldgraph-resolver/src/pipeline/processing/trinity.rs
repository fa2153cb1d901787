use crate::app::ports::ProductCatalog;
use crate::config::ResolverConfig;
use chrono::Utc;
use indexmap::IndexMap;
use tracing::debug;
use weldgraph_core::domain::{OrderData, ProductCategory, SalesRecord, TrinityData};

/// Structured outcome counters for the Trinity formation stage.
#[derive(Debug, Default, Clone)]
pub struct TrinityReport {
    pub trinities_created: usize,
    pub orders_contributing: usize,
    /// Orders that do not reduce to exactly one power source, one feeder
    /// and one cooler; they form no Trinity but still feed co-occurrence.
    pub skipped_non_canonical: usize,
    pub skipped_order_ids: Vec<String>,
}

/// Deduplicated Trinity set, sealed, plus the stage report.
pub struct TrinityOutcome {
    pub trinities: Vec<TrinityData>,
    pub report: TrinityReport,
}

/// Canonicalizes resolved orders into deduplicated Trinity bundles.
pub struct TrinityBuilder<'a> {
    catalog: &'a dyn ProductCatalog,
    no_feeder_gin: String,
    no_cooler_gin: String,
}

impl<'a> TrinityBuilder<'a> {
    pub fn new(catalog: &'a dyn ProductCatalog, config: &ResolverConfig) -> Self {
        Self {
            catalog,
            no_feeder_gin: config.no_feeder_gin.clone(),
            no_cooler_gin: config.no_cooler_gin.clone(),
        }
    }

    /// Fold the split order set into canonical Trinities.
    ///
    /// Two orders resolving to the same (power source, feeder, cooler)
    /// triple collapse into one `TrinityData` whose order list carries both;
    /// a Trinity is only ever mutated by appending contributing orders.
    pub fn build(&self, orders: &[OrderData]) -> TrinityOutcome {
        let mut by_id: IndexMap<String, TrinityData> = IndexMap::new();
        let mut report = TrinityReport::default();

        for order in orders {
            let Some((powersource, feeder, cooler)) = canonical_triple(order) else {
                debug!(
                    "order {}: not a canonical 1/1/1 combination, skipped for Trinity formation",
                    order.order_id
                );
                report.skipped_non_canonical += 1;
                report.skipped_order_ids.push(order.order_id.clone());
                continue;
            };

            let trinity_id = format!(
                "{}_{}_{}",
                powersource.product_id, feeder.product_id, cooler.product_id
            );
            report.orders_contributing += 1;

            if let Some(existing) = by_id.get_mut(&trinity_id) {
                existing.order_ids.push(order.order_id.clone());
                continue;
            }

            let trinity = TrinityData {
                trinity_id: trinity_id.clone(),
                powersource_id: powersource.product_id.clone(),
                feeder_id: feeder.product_id.clone(),
                cooler_id: cooler.product_id.clone(),
                powersource_name: self.resolve_name(powersource),
                feeder_name: self.resolve_name(feeder),
                cooler_name: self.resolve_name(cooler),
                combined_description: self.describe(powersource, feeder, cooler),
                order_ids: vec![order.order_id.clone()],
                created_at: Utc::now(),
            };
            by_id.insert(trinity_id, trinity);
        }

        report.trinities_created = by_id.len();
        TrinityOutcome {
            trinities: by_id.into_values().collect(),
            report,
        }
    }

    /// Human-readable name: catalog name, then the raw line description,
    /// then the bare product id.
    fn resolve_name(&self, record: &SalesRecord) -> String {
        if let Some(name) = self.catalog.product_name(&record.product_id) {
            return name;
        }
        if !record.description.is_empty() {
            return record.description.clone();
        }
        record.product_id.clone()
    }

    fn describe(&self, powersource: &SalesRecord, feeder: &SalesRecord, cooler: &SalesRecord) -> String {
        let feeder_part = if feeder.product_id == self.no_feeder_gin {
            "integrated wire feeding (no separate unit required)".to_string()
        } else {
            format!("{} feeder", self.resolve_name(feeder))
        };
        let cooler_part = if cooler.product_id == self.no_cooler_gin {
            "integrated cooling (no separate unit required)".to_string()
        } else {
            format!("{} cooler", self.resolve_name(cooler))
        };
        format!(
            "{} welding package with {} and {}",
            self.resolve_name(powersource),
            feeder_part,
            cooler_part
        )
    }
}

/// The order's (power source, feeder, cooler) lines when it reduces to
/// exactly one of each.
fn canonical_triple(order: &OrderData) -> Option<(&SalesRecord, &SalesRecord, &SalesRecord)> {
    let powersources = order.lines_in_category(ProductCategory::PowerSource);
    let feeders = order.lines_in_category(ProductCategory::Feeder);
    let coolers = order.lines_in_category(ProductCategory::Cooler);
    if powersources.len() == 1 && feeders.len() == 1 && coolers.len() == 1 {
        Some((powersources[0], feeders[0], coolers[0]))
    } else {
        None
    }
}
