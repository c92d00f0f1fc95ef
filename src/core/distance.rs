// distance.rs - Pairwise distance matrix from a numeric metadata column

use crate::data::{ColumnData, MetadataColumn};
use crate::data::loaders::tsv::parse_numeric;
use crate::error::{MetadataError, Result};
use rayon::prelude::*;
use std::time::Instant;

/// Symmetric, zero-diagonal distance matrix indexed by sample ID
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    ids: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Distance by row/column position
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.data.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Distance by sample ID
    pub fn distance(&self, id1: &str, id2: &str) -> Option<f64> {
        let i = self.ids.iter().position(|id| id == id1)?;
        let j = self.ids.iter().position(|id| id == id2)?;
        self.get(i, j)
    }
}

/// Coerce a column to numbers, rejecting non-numeric and missing values
fn numeric_values(column: &MetadataColumn) -> Result<Vec<f64>> {
    let values: Vec<Option<f64>> = match column.data() {
        ColumnData::Numeric(values) => {
            let bad: Vec<String> = values
                .iter()
                .flatten()
                .filter(|v| !v.is_finite())
                .map(|v| v.to_string())
                .collect();
            if !bad.is_empty() {
                return Err(MetadataError::NonNumeric {
                    column: column.name().to_string(),
                    values: bad.join(", "),
                });
            }
            values.clone()
        }
        ColumnData::Categorical(values) => {
            let bad: Vec<&str> = values
                .iter()
                .flatten()
                .filter(|s| parse_numeric(s).is_none())
                .map(|s| s.as_str())
                .collect();
            if !bad.is_empty() {
                return Err(MetadataError::NonNumeric {
                    column: column.name().to_string(),
                    values: bad.join(", "),
                });
            }
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_numeric))
                .collect()
        }
    };

    let missing: Vec<&str> = column
        .ids()
        .iter()
        .zip(&values)
        .filter(|(_, v)| v.is_none())
        .map(|(id, _)| id.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(MetadataError::MissingValue {
            column: column.name().to_string(),
            ids: missing.join(", "),
        });
    }

    Ok(values.into_iter().flatten().collect())
}

/// Compute the pairwise absolute-difference matrix of a numeric column.
///
/// ID order follows the column's ID order.
pub fn distance_matrix(column: &MetadataColumn) -> Result<DistanceMatrix> {
    if column.is_empty() {
        return Err(MetadataError::InvalidTable(format!(
            "Column '{}' has no rows",
            column.name()
        )));
    }
    let values = numeric_values(column)?;
    let n_samples = values.len();

    let start = Instant::now();
    let mut data = vec![vec![0.0; n_samples]; n_samples];

    let upper_triangle: Vec<(usize, usize, f64)> = (0..n_samples)
        .into_par_iter()
        .flat_map_iter(|i| {
            let values = &values;
            (i + 1..n_samples).map(move |j| (i, j, (values[i] - values[j]).abs()))
        })
        .collect();

    // Fill matrix symmetrically
    for (i, j, distance) in upper_triangle {
        data[i][j] = distance;
        data[j][i] = distance;
    }

    log::debug!(
        "Distance matrix for '{}' ({} x {}) computed in {:.3}s",
        column.name(),
        n_samples,
        n_samples,
        start.elapsed().as_secs_f64()
    );

    Ok(DistanceMatrix {
        ids: column.ids().to_vec(),
        data,
    })
}
