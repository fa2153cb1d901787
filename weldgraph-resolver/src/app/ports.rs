use crate::pipeline::processing::compatibility::DeterminesRow;
use anyhow::Result;
use async_trait::async_trait;
use weldgraph_core::domain::{
    CoOccurrencePair, Customer, OrderData, ResolutionRun, Transaction, TrinityData,
};

/// Source of DETERMINES compatibility rules.
pub trait CompatibilitySource: Send + Sync {
    fn load_determines(&self) -> Result<Vec<DeterminesRow>>;
}

/// Product existence oracle and display-name lookup, backed by the external
/// catalog collaborator.
pub trait ProductCatalog: Send + Sync {
    fn exists(&self, product_id: &str) -> bool;
    fn product_name(&self, product_id: &str) -> Option<String>;
}

/// Output boundary for finished entity batches.
///
/// Callers emit batches in dependency order: customers, then orders, then
/// transactions, then trinities, then co-occurrence pairs.
#[async_trait]
pub trait EntityEmitterPort: Send + Sync {
    async fn begin_run(&self, run: &mut ResolutionRun) -> Result<()>;
    async fn finish_run(&self, run: &ResolutionRun) -> Result<()>;

    async fn emit_customers(&self, customers: &[Customer]) -> Result<()>;
    async fn emit_orders(&self, orders: &[OrderData]) -> Result<()>;
    async fn emit_transactions(&self, transactions: &[Transaction]) -> Result<()>;
    async fn emit_trinities(&self, trinities: &[TrinityData]) -> Result<()>;
    async fn emit_co_occurrences(&self, pairs: &[CoOccurrencePair]) -> Result<()>;
}
