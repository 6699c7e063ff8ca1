//! Data module - catalog loading, cleaning and classification

mod cache;
mod filter;
mod loader;
mod processor;
pub mod table;
pub mod taxonomy;

pub use cache::{DatasetCache, SourceKey};
pub use filter::RecordFilter;
pub use loader::{DataLoader, LoaderError, SourceKind};
pub use processor::{raw_columns, DataProcessor, ProcessorError};
pub use table::{CleanRecord, MeteoriteTable};
pub use taxonomy::{classify, Category};
