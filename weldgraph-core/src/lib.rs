pub mod common;
pub mod domain;
pub mod storage;

pub use domain::*;
pub use storage::memory::MemoryGraphStore;
pub use storage::GraphStore;
