use crate::app::ports::ProductCatalog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use weldgraph_core::domain::{ProductCategory, SalesRecord};

/// A raw sales line as delivered by the upstream transactional system.
///
/// Field names follow the source extract; `gin` is accepted as an alias for
/// `product_id`. All fields default to empty so structurally broken rows
/// still deserialize and can be counted instead of aborting the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSalesLine {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub line_no: String,
    #[serde(default, alias = "gin")]
    pub product_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub facility: String,
    #[serde(default)]
    pub warehouse: String,
    #[serde(default)]
    pub category: String,
}

/// A raw line rejected by structural validation.
#[derive(Debug, Clone)]
pub struct InvalidLine {
    /// Zero-based position of the line in the input batch.
    pub index: usize,
    pub reason: String,
}

/// Structured outcome counters for the normalization stage.
#[derive(Debug, Default, Clone)]
pub struct NormalizeReport {
    pub total_lines: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub unknown_product_skips: usize,
    pub invalid_details: Vec<InvalidLine>,
    pub skipped_product_ids: Vec<String>,
}

/// Validated records grouped by raw order id, plus the stage report.
pub struct NormalizeOutcome {
    pub orders: IndexMap<String, Vec<SalesRecord>>,
    pub report: NormalizeReport,
}

/// Validates raw sales lines and groups them into orders.
pub struct RecordNormalizer {
    validate_references: bool,
}

impl RecordNormalizer {
    pub fn new(validate_references: bool) -> Self {
        Self { validate_references }
    }

    /// Validate every raw line and group the survivors by order id.
    ///
    /// Structural failures (missing order id, line number, or product id)
    /// are hard errors: counted and excluded. Lines referencing a product
    /// the catalog does not know are skipped silently by policy when
    /// reference validation is on; unknown products must never block order
    /// processing.
    pub fn normalize(
        &self,
        lines: &[RawSalesLine],
        catalog: &dyn ProductCatalog,
    ) -> NormalizeOutcome {
        let mut orders: IndexMap<String, Vec<SalesRecord>> = IndexMap::new();
        let mut report = NormalizeReport {
            total_lines: lines.len(),
            ..NormalizeReport::default()
        };

        for (index, line) in lines.iter().enumerate() {
            if let Some(reason) = structural_problem(line) {
                report.invalid_records += 1;
                report.invalid_details.push(InvalidLine { index, reason });
                continue;
            }

            let product_id = line.product_id.trim();
            if self.validate_references && !catalog.exists(product_id) {
                report.unknown_product_skips += 1;
                report.skipped_product_ids.push(product_id.to_string());
                debug!("skipping line {index}: product {product_id} not in catalog");
                continue;
            }

            let record = SalesRecord {
                order_id: line.order_id.trim().to_string(),
                line_no: line.line_no.trim().to_string(),
                product_id: product_id.to_string(),
                description: line.description.trim().to_string(),
                customer: line.customer.trim().to_string(),
                facility: line.facility.trim().to_string(),
                warehouse: line.warehouse.trim().to_string(),
                category: ProductCategory::from_label(&line.category),
            };
            report.valid_records += 1;
            orders.entry(record.order_id.clone()).or_default().push(record);
        }

        NormalizeOutcome { orders, report }
    }
}

fn structural_problem(line: &RawSalesLine) -> Option<String> {
    let mut missing = Vec::new();
    if line.order_id.trim().is_empty() {
        missing.push("order_id");
    }
    if line.line_no.trim().is_empty() {
        missing.push("line_no");
    }
    if line.product_id.trim().is_empty() {
        missing.push("product_id");
    }
    if missing.is_empty() {
        None
    } else {
        Some(format!("missing required field(s): {}", missing.join(", ")))
    }
}
