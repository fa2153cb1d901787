use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of equipment categories a sales line can carry.
///
/// Free-text category labels from upstream systems are folded into this
/// enumeration via [`ProductCategory::from_label`]; anything unrecognized
/// lands in `Unknown` and is excluded from compatibility logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    PowerSource,
    Feeder,
    Cooler,
    Torch,
    Accessory,
    Remote,
    Interconnector,
    Unknown,
}

impl ProductCategory {
    /// Parse a raw category label. Total: never fails, unmatched labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "powersource" | "power source" | "power_source" => Self::PowerSource,
            "feeder" | "wire feeder" | "wirefeeder" => Self::Feeder,
            "cooler" | "cooling unit" | "coolingunit" => Self::Cooler,
            "torch" => Self::Torch,
            "accessory" | "accessories" => Self::Accessory,
            "remote" | "remote control" => Self::Remote,
            "interconnector" | "interconnection" => Self::Interconnector,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerSource => "PowerSource",
            Self::Feeder => "Feeder",
            Self::Cooler => "Cooler",
            Self::Torch => "Torch",
            Self::Accessory => "Accessory",
            Self::Remote => "Remote",
            Self::Interconnector => "Interconnector",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validated sales line. Immutable once produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub line_no: String,
    pub product_id: String,
    pub description: String,
    pub customer: String,
    pub facility: String,
    pub warehouse: String,
    pub category: ProductCategory,
}

/// An order as seen by the pipeline after splitting.
///
/// Derived sub-orders carry a suffixed `order_id` (`"X-1"`, `"X-2"`) while
/// `original_order_id` always points back at the raw source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    pub original_order_id: String,
    pub order_id: String,
    pub customer: String,
    pub facility: String,
    pub warehouse: String,
    pub line_items: Vec<SalesRecord>,
}

impl OrderData {
    /// Lines of the given category, in line order.
    pub fn lines_in_category(&self, category: ProductCategory) -> Vec<&SalesRecord> {
        self.line_items
            .iter()
            .filter(|line| line.category == category)
            .collect()
    }

    /// Distinct product ids across all lines, in first-appearance order.
    pub fn distinct_product_ids(&self) -> IndexSet<&str> {
        self.line_items
            .iter()
            .map(|line| line.product_id.as_str())
            .collect()
    }
}

/// A canonical (PowerSource, Feeder, Cooler) bundle.
///
/// Keyed by `trinity_id = "{ps}_{feeder}_{cooler}"`; two orders resolving to
/// the same triple share one `TrinityData` with a unioned order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrinityData {
    pub trinity_id: String,
    pub powersource_id: String,
    pub feeder_id: String,
    pub cooler_id: String,
    pub powersource_name: String,
    pub feeder_name: String,
    pub cooler_name: String,
    pub combined_description: String,
    pub order_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Undirected co-occurrence statistic for a product pair.
///
/// `product_a < product_b` lexically; a pair is represented exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoOccurrencePair {
    pub product_a: String,
    pub product_b: String,
    pub frequency: u64,
    pub confidence_score: f64,
    pub order_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A customer aggregated over all orders that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub facilities: Vec<String>,
    pub warehouses: Vec<String>,
    pub order_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One retained sales line of an emitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub order_id: String,
    pub product_id: String,
    pub line_no: String,
    pub description: String,
    pub category: ProductCategory,
    pub created_at: DateTime<Utc>,
}

/// Provenance envelope for one resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRun {
    pub id: Option<Uuid>,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
