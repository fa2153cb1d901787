use crate::app::ports::CompatibilitySource;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use weldgraph_core::domain::ProductCategory;

static EMPTY_COMPONENT_SET: Lazy<IndexSet<String>> = Lazy::new(IndexSet::new);

/// One DETERMINES rule: `powersource_id` is compatible with `component_id`
/// of the given category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterminesRow {
    pub powersource_id: String,
    pub component_id: String,
    pub component_category: String,
}

/// Read-only compatibility lookup built once per run from DETERMINES rules.
///
/// `PowerSourceID -> Category -> {ComponentID}`. Lookups never fail: an
/// unknown power source or category yields the empty set, which downstream
/// causes multi-power-source orders to be skipped rather than the run to
/// abort.
#[derive(Debug, Default, Clone)]
pub struct CompatibilityIndex {
    determines: IndexMap<String, IndexMap<ProductCategory, IndexSet<String>>>,
}

impl CompatibilityIndex {
    /// Load the index from a rule source.
    ///
    /// A source failure degrades to an empty index instead of an error:
    /// with no rules every compatibility check fails and the splitter
    /// conservatively drops all multi-power-source orders.
    pub fn load(source: &dyn CompatibilitySource) -> Self {
        match source.load_determines() {
            Ok(rows) => Self::from_rows(rows),
            Err(err) => {
                warn!("failed to load DETERMINES rules, proceeding with empty compatibility index: {err}");
                Self::default()
            }
        }
    }

    pub fn from_rows(rows: Vec<DeterminesRow>) -> Self {
        let mut determines: IndexMap<String, IndexMap<ProductCategory, IndexSet<String>>> =
            IndexMap::new();
        let mut ignored = 0usize;
        for row in rows {
            let category = ProductCategory::from_label(&row.component_category);
            if category == ProductCategory::Unknown {
                ignored += 1;
                continue;
            }
            determines
                .entry(row.powersource_id)
                .or_default()
                .entry(category)
                .or_default()
                .insert(row.component_id);
        }
        if ignored > 0 {
            debug!("ignored {ignored} DETERMINES rows with unknown component category");
        }
        Self { determines }
    }

    /// Component ids the given power source is compatible with in the given
    /// category. Empty set when the power source or category is absent.
    pub fn lookup(&self, powersource_id: &str, category: ProductCategory) -> &IndexSet<String> {
        self.determines
            .get(powersource_id)
            .and_then(|by_category| by_category.get(&category))
            .unwrap_or(&EMPTY_COMPONENT_SET)
    }

    pub fn is_empty(&self) -> bool {
        self.determines.is_empty()
    }

    pub fn powersource_count(&self) -> usize {
        self.determines.len()
    }
}
