use crate::common::constants::{AUTO_COOLER_LINE_NO, AUTO_FEEDER_LINE_NO};
use crate::config::ResolverConfig;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;
use weldgraph_core::domain::{ProductCategory, SalesRecord};

/// Structured outcome counters for the enhancement stage.
#[derive(Debug, Default, Clone)]
pub struct EnhanceReport {
    pub orders_enhanced: usize,
    pub feeder_placeholders_added: usize,
    pub cooler_placeholders_added: usize,
}

/// The enhanced order grouping, sealed, plus the stage report.
pub struct EnhanceOutcome {
    pub orders: IndexMap<String, Vec<SalesRecord>>,
    pub report: EnhanceReport,
}

/// Injects placeholder feeder/cooler records into orders whose power source
/// is a self-contained all-in-one unit.
///
/// Runs before splitting so the splitter's compatibility check treats
/// integrated units uniformly: the DETERMINES rules for an integrated power
/// source point at the reserved placeholder GINs.
pub struct IntegratedUnitEnhancer {
    integrated_units: IndexSet<String>,
    no_feeder_gin: String,
    no_cooler_gin: String,
}

impl IntegratedUnitEnhancer {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            integrated_units: config.integrated_units.iter().cloned().collect(),
            no_feeder_gin: config.no_feeder_gin.clone(),
            no_cooler_gin: config.no_cooler_gin.clone(),
        }
    }

    /// Consume the normalized grouping and return it with placeholders
    /// appended where an integrated power source lacks an explicit feeder
    /// or cooler line.
    ///
    /// Idempotent: placeholder presence is checked by product id membership,
    /// so running the enhancer twice never duplicates a placeholder.
    pub fn enhance(&self, mut orders: IndexMap<String, Vec<SalesRecord>>) -> EnhanceOutcome {
        let mut report = EnhanceReport::default();

        for (order_id, lines) in orders.iter_mut() {
            let Some(anchor) = lines
                .iter()
                .find(|line| {
                    line.category == ProductCategory::PowerSource
                        && self.integrated_units.contains(&line.product_id)
                })
                .cloned()
            else {
                continue;
            };

            let has_feeder = lines.iter().any(|line| {
                line.category == ProductCategory::Feeder || line.product_id == self.no_feeder_gin
            });
            let has_cooler = lines.iter().any(|line| {
                line.category == ProductCategory::Cooler || line.product_id == self.no_cooler_gin
            });

            let mut touched = false;
            if !has_feeder {
                lines.push(placeholder_line(
                    &anchor,
                    &self.no_feeder_gin,
                    AUTO_FEEDER_LINE_NO,
                    "No separate feeder required",
                    ProductCategory::Feeder,
                ));
                report.feeder_placeholders_added += 1;
                touched = true;
            }
            if !has_cooler {
                lines.push(placeholder_line(
                    &anchor,
                    &self.no_cooler_gin,
                    AUTO_COOLER_LINE_NO,
                    "No separate cooling unit required",
                    ProductCategory::Cooler,
                ));
                report.cooler_placeholders_added += 1;
                touched = true;
            }
            if touched {
                report.orders_enhanced += 1;
                debug!(
                    "order {order_id}: injected placeholder component(s) for integrated unit {}",
                    anchor.product_id
                );
            }
        }

        EnhanceOutcome { orders, report }
    }
}

fn placeholder_line(
    anchor: &SalesRecord,
    product_id: &str,
    line_no: &str,
    description: &str,
    category: ProductCategory,
) -> SalesRecord {
    SalesRecord {
        order_id: anchor.order_id.clone(),
        line_no: line_no.to_string(),
        product_id: product_id.to_string(),
        description: description.to_string(),
        customer: anchor.customer.clone(),
        facility: anchor.facility.clone(),
        warehouse: anchor.warehouse.clone(),
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::{NO_COOLER_REQUIRED_GIN, NO_FEEDER_REQUIRED_GIN};

    fn config_with_integrated(gin: &str) -> ResolverConfig {
        ResolverConfig {
            integrated_units: vec![gin.to_string()],
            ..ResolverConfig::default()
        }
    }

    fn line(order_id: &str, line_no: &str, product_id: &str, category: ProductCategory) -> SalesRecord {
        SalesRecord {
            order_id: order_id.into(),
            line_no: line_no.into(),
            product_id: product_id.into(),
            description: String::new(),
            customer: "ACME".into(),
            facility: "F1".into(),
            warehouse: "W1".into(),
            category,
        }
    }

    fn grouped(lines: Vec<SalesRecord>) -> IndexMap<String, Vec<SalesRecord>> {
        let mut orders: IndexMap<String, Vec<SalesRecord>> = IndexMap::new();
        for record in lines {
            orders.entry(record.order_id.clone()).or_default().push(record);
        }
        orders
    }

    #[test]
    fn placeholders_fill_missing_feeder_and_cooler() {
        let enhancer = IntegratedUnitEnhancer::from_config(&config_with_integrated("PS-AIO"));
        let orders = grouped(vec![line("O1", "1", "PS-AIO", ProductCategory::PowerSource)]);

        let outcome = enhancer.enhance(orders);

        let lines = &outcome.orders["O1"];
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().any(|l| l.product_id == NO_FEEDER_REQUIRED_GIN
            && l.category == ProductCategory::Feeder
            && l.line_no == AUTO_FEEDER_LINE_NO));
        assert!(lines.iter().any(|l| l.product_id == NO_COOLER_REQUIRED_GIN
            && l.category == ProductCategory::Cooler
            && l.line_no == AUTO_COOLER_LINE_NO));
        assert_eq!(outcome.report.orders_enhanced, 1);
    }

    #[test]
    fn explicit_component_lines_suppress_placeholders() {
        let enhancer = IntegratedUnitEnhancer::from_config(&config_with_integrated("PS-AIO"));
        let orders = grouped(vec![
            line("O1", "1", "PS-AIO", ProductCategory::PowerSource),
            line("O1", "2", "F1", ProductCategory::Feeder),
        ]);

        let outcome = enhancer.enhance(orders);

        let lines = &outcome.orders["O1"];
        assert_eq!(outcome.report.feeder_placeholders_added, 0);
        assert_eq!(outcome.report.cooler_placeholders_added, 1);
        assert!(!lines.iter().any(|l| l.product_id == NO_FEEDER_REQUIRED_GIN));
    }

    #[test]
    fn enhancement_is_idempotent() {
        let enhancer = IntegratedUnitEnhancer::from_config(&config_with_integrated("PS-AIO"));
        let orders = grouped(vec![line("O1", "1", "PS-AIO", ProductCategory::PowerSource)]);

        let once = enhancer.enhance(orders);
        let twice = enhancer.enhance(once.orders);

        assert_eq!(twice.orders["O1"].len(), 3);
        assert_eq!(twice.report.feeder_placeholders_added, 0);
        assert_eq!(twice.report.cooler_placeholders_added, 0);
        assert_eq!(twice.report.orders_enhanced, 0);
    }

    #[test]
    fn non_integrated_power_sources_are_untouched() {
        let enhancer = IntegratedUnitEnhancer::from_config(&config_with_integrated("PS-AIO"));
        let orders = grouped(vec![line("O1", "1", "PS-PLAIN", ProductCategory::PowerSource)]);

        let outcome = enhancer.enhance(orders);
        assert_eq!(outcome.orders["O1"].len(), 1);
        assert_eq!(outcome.report.orders_enhanced, 0);
    }
}
