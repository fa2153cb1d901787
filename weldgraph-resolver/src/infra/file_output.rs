use crate::app::ports::EntityEmitterPort;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use weldgraph_core::domain::{
    CoOccurrencePair, Customer, OrderData, ResolutionRun, Transaction, TrinityData,
};

/// File-based implementation of [`EntityEmitterPort`].
/// Writes finished entities to separate NDJSON files under one directory.
pub struct FileGraphOutputAdapter {
    customers_file: Mutex<BufWriter<std::fs::File>>,
    orders_file: Mutex<BufWriter<std::fs::File>>,
    transactions_file: Mutex<BufWriter<std::fs::File>>,
    trinities_file: Mutex<BufWriter<std::fs::File>>,
    co_occurrence_file: Mutex<BufWriter<std::fs::File>>,
}

impl FileGraphOutputAdapter {
    pub fn new(out_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(out_dir)?;

        info!("Creating graph output files under {}", out_dir.display());

        Ok(Self {
            customers_file: Mutex::new(open_truncated(out_dir, "customers.ndjson")?),
            orders_file: Mutex::new(open_truncated(out_dir, "orders.ndjson")?),
            transactions_file: Mutex::new(open_truncated(out_dir, "transactions.ndjson")?),
            trinities_file: Mutex::new(open_truncated(out_dir, "trinities.ndjson")?),
            co_occurrence_file: Mutex::new(open_truncated(out_dir, "co_occurrence.ndjson")?),
        })
    }

    fn write_batch<T: Serialize>(
        file: &Mutex<BufWriter<std::fs::File>>,
        label: &str,
        batch: &[T],
    ) -> Result<()> {
        let mut writer = file
            .lock()
            .map_err(|_| anyhow::anyhow!("graph_output: failed to lock {label} file"))?;
        for entity in batch {
            let line = serde_json::to_string(entity)? + "\n";
            writer
                .write_all(line.as_bytes())
                .map_err(|e| anyhow::anyhow!("write {label} failed: {e}"))?;
        }
        writer
            .flush()
            .map_err(|e| anyhow::anyhow!("flush {label} failed: {e}"))?;
        Ok(())
    }
}

fn open_truncated(dir: &Path, name: &str) -> Result<BufWriter<std::fs::File>> {
    let path = dir.join(name);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    Ok(BufWriter::new(file))
}

#[async_trait]
impl EntityEmitterPort for FileGraphOutputAdapter {
    async fn begin_run(&self, run: &mut ResolutionRun) -> Result<()> {
        run.id = Some(Uuid::new_v4());
        info!("starting file-backed emission run {:?}", run.id);
        Ok(())
    }

    async fn finish_run(&self, run: &ResolutionRun) -> Result<()> {
        info!("finished file-backed emission run {:?}", run.id);
        Ok(())
    }

    async fn emit_customers(&self, customers: &[Customer]) -> Result<()> {
        Self::write_batch(&self.customers_file, "customers", customers)
    }

    async fn emit_orders(&self, orders: &[OrderData]) -> Result<()> {
        Self::write_batch(&self.orders_file, "orders", orders)
    }

    async fn emit_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        Self::write_batch(&self.transactions_file, "transactions", transactions)
    }

    async fn emit_trinities(&self, trinities: &[TrinityData]) -> Result<()> {
        Self::write_batch(&self.trinities_file, "trinities", trinities)
    }

    async fn emit_co_occurrences(&self, pairs: &[CoOccurrencePair]) -> Result<()> {
        Self::write_batch(&self.co_occurrence_file, "co_occurrence", pairs)
    }
}
