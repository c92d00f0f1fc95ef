// mod.rs - Core logic module

pub mod distance;
pub mod merge;
pub mod random;

// Re-export main types for convenience
pub use distance::{distance_matrix, DistanceMatrix};
pub use merge::{merge, merge_all, plan_merge, MergeStrategy};
pub use random::{random_groups, GroupPolicy, RandomGroupsOptions};
