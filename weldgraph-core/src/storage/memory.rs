use crate::common::error::{CoreError, Result};
use crate::domain::*;
use crate::storage::traits::GraphStore;
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-memory [`GraphStore`] used as the default collaborator for runs and tests.
///
/// Enforces the referential side of the dependency-ordered write contract:
/// transaction and trinity batches referencing an order that has not been
/// created yet are rejected as a whole.
#[derive(Default)]
pub struct MemoryGraphStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    runs: IndexMap<Uuid, ResolutionRun>,
    customers: IndexMap<String, Customer>,
    orders: IndexMap<String, OrderData>,
    transactions: IndexMap<String, Transaction>,
    trinities: IndexMap<String, TrinityData>,
    co_occurrences: Vec<CoOccurrencePair>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn create_run(&self, run: &mut ResolutionRun) -> Result<()> {
        let id = run.id.unwrap_or_else(Uuid::new_v4);
        run.id = Some(id);
        let mut inner = self.inner.write().await;
        inner.runs.insert(id, run.clone());
        debug!("created resolution run {} ({})", run.name, id);
        Ok(())
    }

    async fn finish_run(&self, run_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        let run = inner
            .runs
            .get_mut(&run_id)
            .ok_or_else(|| CoreError::UnknownReference {
                entity: "run",
                id: run_id.to_string(),
            })?;
        run.finished_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn create_customers(&self, customers: &[Customer]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for customer in customers {
            inner
                .customers
                .insert(customer.customer_id.clone(), customer.clone());
        }
        Ok(())
    }

    async fn create_orders(&self, orders: &[OrderData]) -> Result<()> {
        let mut inner = self.inner.write().await;
        // Validate the whole batch before inserting any of it. An empty
        // customer field means no customer edge, not a dangling reference.
        for order in orders {
            if !order.customer.is_empty() && !inner.customers.contains_key(&order.customer) {
                return Err(CoreError::UnknownReference {
                    entity: "customer",
                    id: order.customer.clone(),
                });
            }
        }
        for order in orders {
            inner.orders.insert(order.order_id.clone(), order.clone());
        }
        Ok(())
    }

    async fn create_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for transaction in transactions {
            if !inner.orders.contains_key(&transaction.order_id) {
                return Err(CoreError::UnknownReference {
                    entity: "order",
                    id: transaction.order_id.clone(),
                });
            }
        }
        for transaction in transactions {
            inner
                .transactions
                .insert(transaction.transaction_id.clone(), transaction.clone());
        }
        Ok(())
    }

    async fn create_trinities(&self, trinities: &[TrinityData]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for trinity in trinities {
            for order_id in &trinity.order_ids {
                if !inner.orders.contains_key(order_id) {
                    return Err(CoreError::UnknownReference {
                        entity: "order",
                        id: order_id.clone(),
                    });
                }
            }
        }
        for trinity in trinities {
            inner
                .trinities
                .insert(trinity.trinity_id.clone(), trinity.clone());
        }
        Ok(())
    }

    async fn create_co_occurrences(&self, pairs: &[CoOccurrencePair]) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.co_occurrences.extend_from_slice(pairs);
        Ok(())
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<OrderData>> {
        Ok(self.inner.read().await.orders.get(order_id).cloned())
    }

    async fn get_trinity(&self, trinity_id: &str) -> Result<Option<TrinityData>> {
        Ok(self.inner.read().await.trinities.get(trinity_id).cloned())
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>> {
        Ok(self.inner.read().await.customers.get(customer_id).cloned())
    }

    async fn get_all_trinities(&self) -> Result<Vec<TrinityData>> {
        Ok(self.inner.read().await.trinities.values().cloned().collect())
    }

    async fn get_all_co_occurrences(&self) -> Result<Vec<CoOccurrencePair>> {
        Ok(self.inner.read().await.co_occurrences.clone())
    }

    async fn order_count(&self) -> Result<usize> {
        Ok(self.inner.read().await.orders.len())
    }

    async fn transaction_count(&self) -> Result<usize> {
        Ok(self.inner.read().await.transactions.len())
    }

    async fn customer_count(&self) -> Result<usize> {
        Ok(self.inner.read().await.customers.len())
    }
}
