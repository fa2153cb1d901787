pub mod determines_source;
pub mod file_output;
pub mod json_catalog;
pub mod sales_reader;
pub mod store_emitter;

pub use determines_source::JsonDeterminesSource;
pub use file_output::FileGraphOutputAdapter;
pub use json_catalog::JsonProductCatalog;
pub use sales_reader::read_sales_lines;
pub use store_emitter::StoreEmitterAdapter;
