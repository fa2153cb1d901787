use crate::pipeline::processing::compatibility::CompatibilityIndex;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};
use weldgraph_core::domain::{OrderData, ProductCategory, SalesRecord};

/// A power source that could not anchor a sub-order because its order held
/// no compatible feeder and/or cooler.
#[derive(Debug, Clone)]
pub struct SkippedPowerSource {
    pub original_order_id: String,
    pub powersource_id: String,
    pub missing_feeder: bool,
    pub missing_cooler: bool,
}

/// Structured outcome counters for the splitting stage.
#[derive(Debug, Default, Clone)]
pub struct SplitReport {
    /// Orders with exactly one distinct power source, passed through unchanged.
    pub pass_through_orders: usize,
    /// Orders holding more than one distinct power source.
    pub multi_powersource_orders: usize,
    /// Sub-orders emitted from multi-power-source orders.
    pub sub_orders_emitted: usize,
    /// Orders dropped because they contain no power source line.
    pub dropped_no_powersource: usize,
    pub skipped_power_sources: Vec<SkippedPowerSource>,
}

/// The resolved order set, sealed, plus the stage report.
pub struct SplitOutcome {
    pub orders: Vec<OrderData>,
    pub report: SplitReport,
}

/// Resolves orders bundling multiple incompatible power sources into
/// self-consistent sub-orders.
///
/// Every emitted order holds at most one power-source line; a power source
/// with no compatible feeder/cooler pair in its order contributes no output
/// at all.
pub struct OrderSplitter<'a> {
    index: &'a CompatibilityIndex,
}

impl<'a> OrderSplitter<'a> {
    pub fn new(index: &'a CompatibilityIndex) -> Self {
        Self { index }
    }

    /// Split every grouped order, preserving input order across emissions.
    pub fn split_all(&self, grouped: &IndexMap<String, Vec<SalesRecord>>) -> SplitOutcome {
        let mut outcome = SplitOutcome {
            orders: Vec::new(),
            report: SplitReport::default(),
        };
        for (order_id, lines) in grouped {
            self.split_order(order_id, lines, &mut outcome);
        }
        outcome
    }

    /// Split a single order.
    ///
    /// Distinct power sources are considered in first-appearance order so
    /// sub-order suffixes are deterministic. Candidate feeders and coolers
    /// are drawn from the *original* unsplit order; the first candidate
    /// present in the compatibility set wins (no scoring among multiple
    /// valid candidates).
    fn split_order(&self, order_id: &str, lines: &[SalesRecord], outcome: &mut SplitOutcome) {
        let unique_powersources: IndexSet<&str> = lines
            .iter()
            .filter(|line| line.category == ProductCategory::PowerSource)
            .map(|line| line.product_id.as_str())
            .collect();

        match unique_powersources.len() {
            0 => {
                // No power source means no Trinity is possible; drop the order.
                debug!("order {order_id}: no power source line, dropped");
                outcome.report.dropped_no_powersource += 1;
            }
            1 => {
                outcome.report.pass_through_orders += 1;
                outcome.orders.push(order_from_lines(order_id, order_id, lines.to_vec()));
            }
            _ => {
                outcome.report.multi_powersource_orders += 1;
                self.split_multi(order_id, lines, &unique_powersources, outcome);
            }
        }
    }

    fn split_multi(
        &self,
        order_id: &str,
        lines: &[SalesRecord],
        unique_powersources: &IndexSet<&str>,
        outcome: &mut SplitOutcome,
    ) {
        let candidate_feeders: IndexSet<&str> = lines
            .iter()
            .filter(|line| line.category == ProductCategory::Feeder)
            .map(|line| line.product_id.as_str())
            .collect();
        let candidate_coolers: IndexSet<&str> = lines
            .iter()
            .filter(|line| line.category == ProductCategory::Cooler)
            .map(|line| line.product_id.as_str())
            .collect();

        let mut sequence = 0usize;
        for powersource_id in unique_powersources {
            let feeder = self.first_compatible(
                powersource_id,
                ProductCategory::Feeder,
                &candidate_feeders,
            );
            let cooler = self.first_compatible(
                powersource_id,
                ProductCategory::Cooler,
                &candidate_coolers,
            );

            let (Some(feeder_id), Some(cooler_id)) = (feeder, cooler) else {
                warn!(
                    "order {order_id}: power source {powersource_id} skipped, missing_feeder={} missing_cooler={}",
                    feeder.is_none(),
                    cooler.is_none()
                );
                outcome.report.skipped_power_sources.push(SkippedPowerSource {
                    original_order_id: order_id.to_string(),
                    powersource_id: powersource_id.to_string(),
                    missing_feeder: feeder.is_none(),
                    missing_cooler: cooler.is_none(),
                });
                continue;
            };

            // The sequence counter advances only on successful emission.
            sequence += 1;
            let sub_order_id = format!("{order_id}-{sequence}");

            let mut line_items = Vec::new();
            if let Some(line) = first_line(lines, ProductCategory::PowerSource, powersource_id) {
                line_items.push(line.clone());
            }
            if let Some(line) = first_line(lines, ProductCategory::Feeder, feeder_id) {
                line_items.push(line.clone());
            }
            if let Some(line) = first_line(lines, ProductCategory::Cooler, cooler_id) {
                line_items.push(line.clone());
            }
            // Accessories are shared: every sub-order carries all of them.
            line_items.extend(
                lines
                    .iter()
                    .filter(|line| line.category == ProductCategory::Accessory)
                    .cloned(),
            );

            debug!(
                "order {order_id}: emitted sub-order {sub_order_id} ({powersource_id}, {feeder_id}, {cooler_id})"
            );
            outcome.report.sub_orders_emitted += 1;
            outcome
                .orders
                .push(order_from_lines(order_id, &sub_order_id, line_items));
        }
    }

    fn first_compatible<'l>(
        &self,
        powersource_id: &str,
        category: ProductCategory,
        candidates: &IndexSet<&'l str>,
    ) -> Option<&'l str> {
        let compatible = self.index.lookup(powersource_id, category);
        candidates
            .iter()
            .find(|candidate| compatible.contains(**candidate))
            .copied()
    }
}

fn first_line<'l>(
    lines: &'l [SalesRecord],
    category: ProductCategory,
    product_id: &str,
) -> Option<&'l SalesRecord> {
    lines
        .iter()
        .find(|line| line.category == category && line.product_id == product_id)
}

fn order_from_lines(original_order_id: &str, order_id: &str, line_items: Vec<SalesRecord>) -> OrderData {
    let (customer, facility, warehouse) = line_items
        .first()
        .map(|line| {
            (
                line.customer.clone(),
                line.facility.clone(),
                line.warehouse.clone(),
            )
        })
        .unwrap_or_default();
    OrderData {
        original_order_id: original_order_id.to_string(),
        order_id: order_id.to_string(),
        customer,
        facility,
        warehouse,
        line_items,
    }
}
