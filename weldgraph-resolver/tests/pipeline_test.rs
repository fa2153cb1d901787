use anyhow::Result;
use std::sync::Arc;

use weldgraph_core::domain::ProductCategory;
use weldgraph_core::storage::GraphStore;
use weldgraph_core::MemoryGraphStore;
use weldgraph_resolver::app::ports::{CompatibilitySource, ProductCatalog};
use weldgraph_resolver::app::resolve_use_case::ResolveUseCase;
use weldgraph_resolver::common::constants::{NO_COOLER_REQUIRED_GIN, NO_FEEDER_REQUIRED_GIN};
use weldgraph_resolver::config::ResolverConfig;
use weldgraph_resolver::infra::{JsonProductCatalog, StoreEmitterAdapter};
use weldgraph_resolver::pipeline::processing::compatibility::DeterminesRow;
use weldgraph_resolver::RawSalesLine;

struct StaticRules(Vec<DeterminesRow>);

impl CompatibilitySource for StaticRules {
    fn load_determines(&self) -> Result<Vec<DeterminesRow>> {
        Ok(self.0.clone())
    }
}

fn rule(ps: &str, component: &str, category: &str) -> DeterminesRow {
    DeterminesRow {
        powersource_id: ps.into(),
        component_id: component.into(),
        component_category: category.into(),
    }
}

fn raw(order_id: &str, line_no: &str, product_id: &str, category: &str, customer: &str) -> RawSalesLine {
    RawSalesLine {
        order_id: order_id.into(),
        line_no: line_no.into(),
        product_id: product_id.into(),
        category: category.into(),
        customer: customer.into(),
        facility: "GOTHENBURG".into(),
        warehouse: "W1".into(),
        ..RawSalesLine::default()
    }
}

fn catalog() -> JsonProductCatalog {
    JsonProductCatalog::from_entries(
        [
            ("PS1", "Aristo 500ix"),
            ("PS2", "Warrior 500i"),
            ("PS-AIO", "Renegade ES300i"),
            ("F1", "RobustFeed U82"),
            ("F2", "Aristo Feed 3004"),
            ("C1", "Cool 2"),
            ("C2", "Cool U31"),
            ("ACC1", "Return cable kit"),
            ("T1", "PSF 305 torch"),
        ]
        .iter()
        .map(|(id, name)| (id.to_string(), name.to_string())),
    )
}

fn rules() -> StaticRules {
    StaticRules(vec![
        rule("PS1", "F1", "Feeder"),
        rule("PS1", "C1", "Cooler"),
        rule("PS2", "F2", "Feeder"),
        rule("PS2", "C2", "Cooler"),
        rule("PS-AIO", NO_FEEDER_REQUIRED_GIN, "Feeder"),
        rule("PS-AIO", NO_COOLER_REQUIRED_GIN, "Cooler"),
    ])
}

fn config() -> ResolverConfig {
    ResolverConfig {
        integrated_units: vec!["PS-AIO".to_string()],
        ..ResolverConfig::default()
    }
}

/// The raw extract: one multi-power-source order that must split, one
/// integrated-unit order that needs placeholders, one accessory-only order
/// that must be dropped, and one structurally broken line.
fn sample_lines() -> Vec<RawSalesLine> {
    vec![
        // Order bundling two incompatible power sources with shared accessories.
        raw("100640282", "1", "PS1", "PowerSource", "ACME"),
        raw("100640282", "2", "PS2", "PowerSource", "ACME"),
        raw("100640282", "3", "F1", "Feeder", "ACME"),
        raw("100640282", "4", "F2", "Feeder", "ACME"),
        raw("100640282", "5", "C1", "Cooler", "ACME"),
        raw("100640282", "6", "C2", "Cooler", "ACME"),
        raw("100640282", "7", "ACC1", "Accessory", "ACME"),
        // Integrated unit: no feeder or cooler lines on the raw order.
        raw("100640300", "1", "PS-AIO", "PowerSource", "NORDIC WELD"),
        raw("100640300", "2", "T1", "Torch", "NORDIC WELD"),
        // No power source: dropped by the splitter.
        raw("100640311", "1", "ACC1", "Accessory", "ACME"),
        // Structurally invalid: missing product id.
        raw("100640312", "1", "", "Accessory", "ACME"),
        // Unknown product: silently skipped.
        raw("100640282", "8", "GHOST-GIN", "Accessory", "ACME"),
    ]
}

async fn run_pipeline() -> Result<(Arc<MemoryGraphStore>, weldgraph_resolver::app::resolve_use_case::ResolutionSummary)> {
    let store = Arc::new(MemoryGraphStore::new());
    let emitter = StoreEmitterAdapter::new(store.clone());
    let use_case = ResolveUseCase::new(config(), Box::new(emitter));
    let summary = use_case
        .resolve(&sample_lines(), &rules(), &catalog())
        .await?;
    Ok((store, summary))
}

#[tokio::test]
async fn multi_powersource_order_splits_into_two_sub_orders() -> Result<()> {
    let (store, summary) = run_pipeline().await?;

    let first = store.get_order("100640282-1").await?.expect("sub-order 1");
    let second = store.get_order("100640282-2").await?.expect("sub-order 2");
    assert_eq!(first.original_order_id, "100640282");
    assert_eq!(second.original_order_id, "100640282");

    let first_ps = first.lines_in_category(ProductCategory::PowerSource);
    let second_ps = second.lines_in_category(ProductCategory::PowerSource);
    assert_eq!(first_ps.len(), 1);
    assert_eq!(second_ps.len(), 1);
    assert_ne!(first_ps[0].product_id, second_ps[0].product_id);

    // The unsplit original never lands in the store.
    assert!(store.get_order("100640282").await?.is_none());
    assert_eq!(summary.split.sub_orders_emitted, 2);
    Ok(())
}

#[tokio::test]
async fn integrated_unit_forms_trinity_with_placeholder_components() -> Result<()> {
    let (store, _) = run_pipeline().await?;

    let trinity_id = format!("PS-AIO_{NO_FEEDER_REQUIRED_GIN}_{NO_COOLER_REQUIRED_GIN}");
    let trinity = store.get_trinity(&trinity_id).await?.expect("integrated trinity");
    assert_eq!(trinity.order_ids, vec!["100640300"]);
    assert!(trinity
        .combined_description
        .contains("integrated wire feeding (no separate unit required)"));
    assert!(trinity
        .combined_description
        .contains("integrated cooling (no separate unit required)"));
    assert!(trinity.combined_description.contains("Renegade ES300i"));
    Ok(())
}

#[tokio::test]
async fn split_sub_orders_form_distinct_trinities() -> Result<()> {
    let (store, summary) = run_pipeline().await?;

    let first = store.get_trinity("PS1_F1_C1").await?.expect("trinity PS1");
    let second = store.get_trinity("PS2_F2_C2").await?.expect("trinity PS2");
    assert_eq!(first.order_ids, vec!["100640282-1"]);
    assert_eq!(second.order_ids, vec!["100640282-2"]);
    assert_eq!(summary.trinity.trinities_created, 3);
    Ok(())
}

#[tokio::test]
async fn accessory_only_orders_and_broken_lines_yield_no_entities() -> Result<()> {
    let (store, summary) = run_pipeline().await?;

    assert!(store.get_order("100640311").await?.is_none());
    assert!(store.get_order("100640312").await?.is_none());
    assert_eq!(summary.split.dropped_no_powersource, 1);
    assert_eq!(summary.normalize.invalid_records, 1);
    assert_eq!(summary.normalize.unknown_product_skips, 1);
    Ok(())
}

#[tokio::test]
async fn co_occurrence_runs_over_the_split_order_set() -> Result<()> {
    let (store, _) = run_pipeline().await?;

    let pairs = store.get_all_co_occurrences().await?;
    // PS1 and PS2 were separated by the split, so they never co-occur.
    assert!(!pairs.iter().any(|pair| pair.product_a == "PS1" && pair.product_b == "PS2"));
    // Each power source co-occurs with its matched feeder.
    let ps1_f1 = pairs
        .iter()
        .find(|pair| pair.product_a == "F1" && pair.product_b == "PS1")
        .expect("F1/PS1 pair");
    assert_eq!(ps1_f1.frequency, 1);
    assert_eq!(ps1_f1.order_ids, vec!["100640282-1"]);
    Ok(())
}

#[tokio::test]
async fn customers_aggregate_over_emitted_orders() -> Result<()> {
    let (store, summary) = run_pipeline().await?;

    let acme = store.get_customer("ACME").await?.expect("ACME customer");
    assert!(acme.order_ids.contains(&"100640282-1".to_string()));
    assert!(acme.order_ids.contains(&"100640282-2".to_string()));
    let nordic = store.get_customer("NORDIC WELD").await?.expect("NORDIC WELD");
    assert_eq!(nordic.order_ids, vec!["100640300"]);
    assert_eq!(summary.customers_emitted, 2);
    Ok(())
}

#[tokio::test]
async fn rerunning_identical_input_reproduces_the_same_graph() -> Result<()> {
    let (first_store, first_summary) = run_pipeline().await?;
    let (second_store, second_summary) = run_pipeline().await?;

    let mut first_trinities: Vec<String> = first_store
        .get_all_trinities()
        .await?
        .into_iter()
        .map(|t| t.trinity_id)
        .collect();
    let mut second_trinities: Vec<String> = second_store
        .get_all_trinities()
        .await?
        .into_iter()
        .map(|t| t.trinity_id)
        .collect();
    first_trinities.sort();
    second_trinities.sort();
    assert_eq!(first_trinities, second_trinities);

    let first_pairs: Vec<(String, String, u64)> = first_store
        .get_all_co_occurrences()
        .await?
        .into_iter()
        .map(|p| (p.product_a, p.product_b, p.frequency))
        .collect();
    let second_pairs: Vec<(String, String, u64)> = second_store
        .get_all_co_occurrences()
        .await?
        .into_iter()
        .map(|p| (p.product_a, p.product_b, p.frequency))
        .collect();
    assert_eq!(first_pairs, second_pairs);

    assert_eq!(first_summary.orders_emitted, second_summary.orders_emitted);
    assert_eq!(
        first_summary.transactions_emitted,
        second_summary.transactions_emitted
    );
    Ok(())
}

#[tokio::test]
async fn powersource_without_compatible_pair_is_skipped_with_flags() -> Result<()> {
    // PS2's determined feeder is absent from the order.
    let lines = vec![
        raw("200", "1", "PS1", "PowerSource", "ACME"),
        raw("200", "2", "PS2", "PowerSource", "ACME"),
        raw("200", "3", "F1", "Feeder", "ACME"),
        raw("200", "4", "C1", "Cooler", "ACME"),
        raw("200", "5", "C2", "Cooler", "ACME"),
    ];
    let store = Arc::new(MemoryGraphStore::new());
    let use_case = ResolveUseCase::new(config(), Box::new(StoreEmitterAdapter::new(store.clone())));
    let summary = use_case.resolve(&lines, &rules(), &catalog()).await?;

    assert_eq!(summary.split.sub_orders_emitted, 1);
    let skipped = &summary.split.skipped_power_sources;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].powersource_id, "PS2");
    assert!(skipped[0].missing_feeder);
    assert!(!skipped[0].missing_cooler);
    assert!(store.get_order("200-2").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unreachable_rule_source_degrades_to_conservative_run() -> Result<()> {
    struct DownSource;
    impl CompatibilitySource for DownSource {
        fn load_determines(&self) -> Result<Vec<DeterminesRow>> {
            anyhow::bail!("relationship store unreachable")
        }
    }

    let store = Arc::new(MemoryGraphStore::new());
    let use_case = ResolveUseCase::new(config(), Box::new(StoreEmitterAdapter::new(store.clone())));
    let summary = use_case
        .resolve(&sample_lines(), &DownSource, &catalog())
        .await?;

    // The run completes; every multi-power-source order is dropped.
    assert_eq!(summary.split.sub_orders_emitted, 0);
    assert_eq!(summary.split.skipped_power_sources.len(), 2);
    // Single-power-source orders still pass through.
    assert!(store.get_order("100640300").await?.is_some());
    Ok(())
}

/// A catalog that knows every product; used to confirm the existence oracle
/// is consulted only when reference validation is enabled.
struct OpenCatalog;

impl ProductCatalog for OpenCatalog {
    fn exists(&self, _product_id: &str) -> bool {
        true
    }

    fn product_name(&self, _product_id: &str) -> Option<String> {
        None
    }
}

#[tokio::test]
async fn disabled_reference_validation_keeps_unknown_products() -> Result<()> {
    let lines = vec![
        raw("300", "1", "PS1", "PowerSource", "ACME"),
        raw("300", "2", "GHOST-GIN", "Accessory", "ACME"),
    ];
    let store = Arc::new(MemoryGraphStore::new());
    let mut cfg = config();
    cfg.validate_references = false;
    let use_case = ResolveUseCase::new(cfg, Box::new(StoreEmitterAdapter::new(store.clone())));
    let summary = use_case.resolve(&lines, &rules(), &OpenCatalog).await?;

    assert_eq!(summary.normalize.unknown_product_skips, 0);
    let order = store.get_order("300").await?.expect("order 300");
    assert_eq!(order.line_items.len(), 2);
    Ok(())
}
