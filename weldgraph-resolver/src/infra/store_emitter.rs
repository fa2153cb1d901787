use crate::app::ports::EntityEmitterPort;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use weldgraph_core::domain::{
    CoOccurrencePair, Customer, OrderData, ResolutionRun, Transaction, TrinityData,
};
use weldgraph_core::storage::GraphStore;

/// [`EntityEmitterPort`] backed by a [`GraphStore`].
///
/// A thin delegation layer; dependency ordering is the caller's contract
/// and referential checks are the store's.
pub struct StoreEmitterAdapter {
    store: Arc<dyn GraphStore>,
}

impl StoreEmitterAdapter {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntityEmitterPort for StoreEmitterAdapter {
    async fn begin_run(&self, run: &mut ResolutionRun) -> Result<()> {
        self.store.create_run(run).await?;
        Ok(())
    }

    async fn finish_run(&self, run: &ResolutionRun) -> Result<()> {
        if let Some(run_id) = run.id {
            self.store.finish_run(run_id).await?;
        }
        Ok(())
    }

    async fn emit_customers(&self, customers: &[Customer]) -> Result<()> {
        debug!("emitting {} customers", customers.len());
        self.store.create_customers(customers).await?;
        Ok(())
    }

    async fn emit_orders(&self, orders: &[OrderData]) -> Result<()> {
        debug!("emitting {} orders", orders.len());
        self.store.create_orders(orders).await?;
        Ok(())
    }

    async fn emit_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        debug!("emitting {} transactions", transactions.len());
        self.store.create_transactions(transactions).await?;
        Ok(())
    }

    async fn emit_trinities(&self, trinities: &[TrinityData]) -> Result<()> {
        debug!("emitting {} trinities", trinities.len());
        self.store.create_trinities(trinities).await?;
        Ok(())
    }

    async fn emit_co_occurrences(&self, pairs: &[CoOccurrencePair]) -> Result<()> {
        debug!("emitting {} co-occurrence pairs", pairs.len());
        self.store.create_co_occurrences(pairs).await?;
        Ok(())
    }
}
