// lib.rs - metatab library root

//! # metatab - Sample metadata tables: merge, distance, random groups, tabulate
//!
//! This library loads sample-indexed metadata tables (TSV/CSV with optional
//! `#q2:types` directives) and provides four operations over them.
//!
//! ## Features
//!
//! - **Merge**: combine tables that overlap in ids or in columns (not both)
//! - **Distance**: pairwise absolute-difference matrix of a numeric column
//! - **Random groups**: size-preserving shuffled groupings for null-model tests
//! - **Tabulate**: paginated, sortable HTML view of a table
//! - **Multiple formats**: TSV, CSV, PHYLIP, NEXUS distance matrix output
//! - **Flexible filtering**: id filtering with regex and file lists
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use metatab::prelude::*;
//! use rand::SeedableRng;
//!
//! let left = MetadataTable::from_file(std::path::Path::new("left.tsv"))?;
//! let right = MetadataTable::from_file(std::path::Path::new("right.tsv"))?;
//! let merged = merge(&left, &right)?;
//!
//! let depth = merged.column("depth")?;
//! let dm = distance_matrix(&depth)?;
//! write_matrix("depth.phy", "phylip", &dm, "example")?;
//!
//! let site = merged.column("site")?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let groups = random_groups(&site, &RandomGroupsOptions::default(), &mut rng)?;
//! tabulate(&groups, 100, std::path::Path::new("groups_view"))?;
//! # Ok::<(), MetadataError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Command, ValidationResult};
    pub use crate::core::{distance_matrix, merge, merge_all, plan_merge, random_groups};
    pub use crate::core::{DistanceMatrix, GroupPolicy, MergeStrategy, RandomGroupsOptions};
    pub use crate::data::{Column, ColumnData, ColumnKind, MetadataColumn, MetadataTable, Value};
    pub use crate::error::MetadataError;
    pub use crate::output::{serialize_table, tabulate, write_matrix, write_table};
    pub use crate::output::{HtmlRenderer, TableRenderer};
    pub use crate::VERSION;
}

// Direct re-exports for convenience
pub use crate::core::{distance_matrix, merge, merge_all, random_groups};
pub use crate::data::{MetadataColumn, MetadataTable};
pub use crate::error::{MetadataError, Result};
pub use crate::output::tabulate;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "metatab v{} - Sample metadata merge, distance, randomization and tabulation",
        VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_info() {
        let info = get_info();
        assert!(info.contains("metatab"));
        assert!(info.contains(VERSION));
    }
}
