// mod.rs - Data structures module

pub mod loaders;
pub mod table;

// Re-export main types for convenience
pub use loaders::is_id_header;
pub use table::{
    Column, ColumnData, ColumnKind, MetadataColumn, MetadataTable, TableSummary, Value,
};
