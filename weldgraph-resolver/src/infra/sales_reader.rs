use crate::common::error::Result;
use crate::pipeline::processing::normalize::RawSalesLine;
use std::path::Path;
use tracing::info;

/// Read raw sales lines from a JSON array file.
///
/// Field names follow the source extract (spec-equivalent schema); `gin` is
/// accepted for `product_id`. Structural validation happens later in the
/// normalizer, not here.
pub fn read_sales_lines(path: &Path) -> Result<Vec<RawSalesLine>> {
    let raw = std::fs::read_to_string(path)?;
    let lines: Vec<RawSalesLine> = serde_json::from_str(&raw)?;
    info!("read {} raw sales lines from {}", lines.len(), path.display());
    Ok(lines)
}
