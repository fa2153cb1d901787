use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence boundary for finished graph entities.
///
/// Callers are responsible for dependency-ordered writes: customers before
/// orders, orders before transactions and trinities, trinities before any
/// edge that references them. Implementations reject batches that reference
/// entities not yet created instead of reordering on the caller's behalf.
/// A failed batch must leave previously committed batches intact; there is
/// no cross-batch rollback.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // Run bookkeeping
    async fn create_run(&self, run: &mut ResolutionRun) -> Result<()>;
    async fn finish_run(&self, run_id: Uuid) -> Result<()>;

    // Batch writes, one per entity type
    async fn create_customers(&self, customers: &[Customer]) -> Result<()>;
    async fn create_orders(&self, orders: &[OrderData]) -> Result<()>;
    async fn create_transactions(&self, transactions: &[Transaction]) -> Result<()>;
    async fn create_trinities(&self, trinities: &[TrinityData]) -> Result<()>;
    async fn create_co_occurrences(&self, pairs: &[CoOccurrencePair]) -> Result<()>;

    // Read-back queries used by diagnostics and tests
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderData>>;
    async fn get_trinity(&self, trinity_id: &str) -> Result<Option<TrinityData>>;
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>>;
    async fn get_all_trinities(&self) -> Result<Vec<TrinityData>>;
    async fn get_all_co_occurrences(&self) -> Result<Vec<CoOccurrencePair>>;
    async fn order_count(&self) -> Result<usize>;
    async fn transaction_count(&self) -> Result<usize>;
    async fn customer_count(&self) -> Result<usize>;
}
