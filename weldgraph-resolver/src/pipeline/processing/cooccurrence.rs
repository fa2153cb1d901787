use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use weldgraph_core::domain::{CoOccurrencePair, OrderData};

/// Structured outcome counters for the co-occurrence stage.
#[derive(Debug, Default, Clone)]
pub struct CoOccurrenceReport {
    pub orders_processed: usize,
    /// Orders with fewer than two distinct products contribute no pairs.
    pub orders_without_pairs: usize,
    pub distinct_pairs: usize,
    pub max_frequency: u64,
}

/// The pair statistics, sealed, plus the stage report.
pub struct CoOccurrenceOutcome {
    pub pairs: Vec<CoOccurrencePair>,
    pub report: CoOccurrenceReport,
}

/// Computes undirected product co-occurrence statistics over the
/// *post-split* order set.
///
/// Operating on split orders rather than raw input is essential: splitting
/// changes which products count as appearing "together". Confidence is
/// relative to the strongest pair of the run, not an absolute probability.
pub struct CoOccurrenceAggregator;

impl CoOccurrenceAggregator {
    pub fn aggregate(orders: &[OrderData]) -> CoOccurrenceOutcome {
        let mut accumulator: IndexMap<(String, String), (u64, Vec<String>)> = IndexMap::new();
        let mut report = CoOccurrenceReport {
            orders_processed: orders.len(),
            ..CoOccurrenceReport::default()
        };

        for order in orders {
            let products: IndexSet<&str> = order.distinct_product_ids();
            if products.len() < 2 {
                report.orders_without_pairs += 1;
                continue;
            }
            for (i, left) in products.iter().enumerate() {
                for right in products.iter().skip(i + 1) {
                    let key = sorted_pair(left, right);
                    let entry = accumulator.entry(key).or_insert_with(|| (0, Vec::new()));
                    entry.0 += 1;
                    entry.1.push(order.order_id.clone());
                }
            }
        }

        let max_frequency = accumulator
            .values()
            .map(|(frequency, _)| *frequency)
            .max()
            .unwrap_or(0);

        let created_at = Utc::now();
        let mut pairs: Vec<CoOccurrencePair> = accumulator
            .into_iter()
            .map(|((product_a, product_b), (frequency, order_ids))| CoOccurrencePair {
                product_a,
                product_b,
                frequency,
                confidence_score: frequency as f64 / max_frequency as f64,
                order_ids,
                created_at,
            })
            .collect();

        // Descending frequency, pair key as tie-break, so repeated runs emit
        // an identical stream.
        pairs.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.product_a.cmp(&b.product_a))
                .then_with(|| a.product_b.cmp(&b.product_b))
        });

        report.distinct_pairs = pairs.len();
        report.max_frequency = max_frequency;
        CoOccurrenceOutcome { pairs, report }
    }
}

fn sorted_pair(left: &str, right: &str) -> (String, String) {
    if left <= right {
        (left.to_string(), right.to_string())
    } else {
        (right.to_string(), left.to_string())
    }
}
