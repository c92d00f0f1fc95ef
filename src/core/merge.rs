// merge.rs - Merge engine for metadata tables

use crate::data::{Column, MetadataTable};
use crate::error::{join_sorted, MetadataError, Result};
use std::collections::HashSet;

/// How two tables are combined, decided from their ID and column overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// No shared columns: plain outer join on ID
    OuterJoin,
    /// Shared columns but no shared IDs: outer join, then fill shared columns
    /// from the first table and fall back to the second
    Reconcile,
}

/// Pick the merge strategy, failing when IDs and columns both overlap
pub fn plan_merge(table1: &MetadataTable, table2: &MetadataTable) -> Result<MergeStrategy> {
    let ids2: HashSet<&str> = table2.ids().iter().map(|s| s.as_str()).collect();
    let cols2: HashSet<&str> = table2.column_names().into_iter().collect();

    let overlapping_ids: Vec<&str> = table1
        .ids()
        .iter()
        .map(|s| s.as_str())
        .filter(|id| ids2.contains(id))
        .collect();
    let overlapping_columns: Vec<&str> = table1
        .column_names()
        .into_iter()
        .filter(|c| cols2.contains(c))
        .collect();

    log::debug!(
        "Merge overlap: {} ids, {} columns",
        overlapping_ids.len(),
        overlapping_columns.len()
    );

    if !overlapping_ids.is_empty() && !overlapping_columns.is_empty() {
        return Err(MetadataError::Conflict {
            n_ids: overlapping_ids.len(),
            ids: join_sorted(&overlapping_ids),
            n_columns: overlapping_columns.len(),
            columns: join_sorted(&overlapping_columns),
        });
    }

    if table1.id_header() != table2.id_header() {
        return Err(MetadataError::SchemaMismatch {
            left: table1.id_header().to_string(),
            right: table2.id_header().to_string(),
        });
    }

    if overlapping_columns.is_empty() {
        Ok(MergeStrategy::OuterJoin)
    } else {
        for name in &overlapping_columns {
            let (Some(left), Some(right)) = (table1.column_ref(name), table2.column_ref(name))
            else {
                continue;
            };
            if left.kind() != right.kind() {
                return Err(MetadataError::TypeMismatch {
                    column: name.to_string(),
                    left: left.kind().to_string(),
                    right: right.kind().to_string(),
                });
            }
        }
        Ok(MergeStrategy::Reconcile)
    }
}

/// Merge two metadata tables into a new one.
///
/// Output IDs are those of `table1` followed by the IDs only `table2` has;
/// columns follow the same rule. Cells absent from a side become missing.
/// Shared columns take `table1`'s value where present, else `table2`'s.
pub fn merge(table1: &MetadataTable, table2: &MetadataTable) -> Result<MetadataTable> {
    let strategy = plan_merge(table1, table2)?;
    log::debug!("Merging with strategy {:?}", strategy);

    let mut ids: Vec<String> = table1.ids().to_vec();
    ids.extend(
        table2
            .ids()
            .iter()
            .filter(|id| !table1.contains_id(id))
            .cloned(),
    );

    let positions1: Vec<Option<usize>> = ids.iter().map(|id| table1.position(id)).collect();
    let positions2: Vec<Option<usize>> = ids.iter().map(|id| table2.position(id)).collect();

    let mut columns = Vec::with_capacity(table1.n_columns() + table2.n_columns());
    for column in table1.columns() {
        let left = column.data.select(&positions1);
        let shared = match strategy {
            MergeStrategy::OuterJoin => None,
            MergeStrategy::Reconcile => table2.column_ref(&column.name),
        };
        let data = match shared {
            Some(other) => {
                let right = other.data.select(&positions2);
                left.combine_first(&right)
                    .ok_or_else(|| MetadataError::TypeMismatch {
                        column: column.name.clone(),
                        left: column.kind().to_string(),
                        right: other.kind().to_string(),
                    })?
            }
            None => left,
        };
        columns.push(Column {
            name: column.name.clone(),
            data,
        });
    }
    for column in table2.columns() {
        if strategy == MergeStrategy::OuterJoin || table1.column_ref(&column.name).is_none() {
            columns.push(Column {
                name: column.name.clone(),
                data: column.data.select(&positions2),
            });
        }
    }

    MetadataTable::new(table1.id_header(), ids, columns)
}

/// Merge any number of tables left to right
pub fn merge_all(tables: &[MetadataTable]) -> Result<MetadataTable> {
    let (first, rest) = tables.split_first().ok_or_else(|| {
        MetadataError::Configuration("At least one metadata table is required".to_string())
    })?;

    let mut merged = first.clone();
    for table in rest {
        merged = merge(&merged, table)?;
    }
    Ok(merged)
}
