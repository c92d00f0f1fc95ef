// table.rs - Metadata table data structures

use crate::error::{MetadataError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Declared kind of a metadata column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "numeric" => Ok(ColumnKind::Numeric),
            "categorical" => Ok(ColumnKind::Categorical),
            other => Err(MetadataError::InvalidTable(format!(
                "Unknown column type '{}'. Use: numeric, categorical",
                other
            ))),
        }
    }
}

/// A single non-missing cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Numeric(f64),
    Categorical(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{}", v),
            Value::Categorical(s) => f.write_str(s),
        }
    }
}

/// Column values aligned to the table's ID sequence; `None` is a missing value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at row `i`, or `None` when missing or out of range
    pub fn value(&self, i: usize) -> Option<Value> {
        match self {
            ColumnData::Numeric(v) => v.get(i).copied().flatten().map(Value::Numeric),
            ColumnData::Categorical(v) => v
                .get(i)
                .and_then(|s| s.clone())
                .map(Value::Categorical),
        }
    }

    pub fn is_missing(&self, i: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => v.get(i).map(|x| x.is_none()).unwrap_or(true),
            ColumnData::Categorical(v) => v.get(i).map(|x| x.is_none()).unwrap_or(true),
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Cell text for every row, `None` where missing
    pub fn to_strings(&self) -> Vec<Option<String>> {
        match self {
            ColumnData::Numeric(v) => v.iter().map(|x| x.map(|n| n.to_string())).collect(),
            ColumnData::Categorical(v) => v.clone(),
        }
    }

    /// Reindex the column: row `i` of the result takes row `positions[i]` of
    /// `self`, or a missing value where the position is `None`.
    pub fn select(&self, positions: &[Option<usize>]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(
                positions
                    .iter()
                    .map(|p| p.and_then(|i| v.get(i).copied().flatten()))
                    .collect(),
            ),
            ColumnData::Categorical(v) => ColumnData::Categorical(
                positions
                    .iter()
                    .map(|p| p.and_then(|i| v.get(i).cloned().flatten()))
                    .collect(),
            ),
        }
    }

    /// Fill missing cells of `self` with the aligned cells of `other`.
    /// Returns `None` when the two columns differ in kind or length.
    pub fn combine_first(&self, other: &ColumnData) -> Option<ColumnData> {
        if self.len() != other.len() {
            return None;
        }
        match (self, other) {
            (ColumnData::Numeric(a), ColumnData::Numeric(b)) => Some(ColumnData::Numeric(
                a.iter().zip(b).map(|(x, y)| x.or(*y)).collect(),
            )),
            (ColumnData::Categorical(a), ColumnData::Categorical(b)) => {
                Some(ColumnData::Categorical(
                    a.iter()
                        .zip(b)
                        .map(|(x, y)| x.clone().or_else(|| y.clone()))
                        .collect(),
                ))
            }
            _ => None,
        }
    }
}

/// Named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }
}

/// A single column detached from its table, together with the ID sequence it
/// is aligned to. Input type for distance computation and randomization.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataColumn {
    id_header: String,
    ids: Vec<String>,
    column: Column,
}

impl MetadataColumn {
    pub fn new(id_header: impl Into<String>, ids: Vec<String>, column: Column) -> Result<Self> {
        let id_header = id_header.into();
        // Reuse the table invariants (unique ids, aligned length)
        let table = MetadataTable::new(id_header, ids, vec![column])?;
        let MetadataTable {
            id_header,
            ids,
            mut columns,
            ..
        } = table;
        let column = columns.remove(0);
        Ok(Self {
            id_header,
            ids,
            column,
        })
    }

    pub fn name(&self) -> &str {
        &self.column.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.column.kind()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    pub fn data(&self) -> &ColumnData {
        &self.column.data
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Wrap the column back into a one-column table
    pub fn into_table(self) -> MetadataTable {
        MetadataTable::from_parts(self.id_header, self.ids, vec![self.column])
    }
}

/// Summary statistics for a metadata table
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub n_ids: usize,
    pub n_columns: usize,
    pub n_numeric: usize,
    pub n_categorical: usize,
    pub missing_cells: usize,
    pub missing_percent: f64,
    pub complete_ids: usize,
}

/// Sample-indexed table of typed columns
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTable {
    id_header: String,
    ids: Vec<String>,
    columns: Vec<Column>,
    id_index: HashMap<String, usize>,
}

impl MetadataTable {
    /// Build a table, enforcing ID and column invariants
    pub fn new(id_header: impl Into<String>, ids: Vec<String>, mut columns: Vec<Column>) -> Result<Self> {
        let id_header = id_header.into();
        if id_header.trim().is_empty() {
            return Err(MetadataError::InvalidTable(
                "Identifier column label cannot be empty".to_string(),
            ));
        }
        if ids.is_empty() {
            return Err(MetadataError::InvalidTable(
                "Metadata must contain at least one ID".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for id in &ids {
            if id.is_empty() {
                return Err(MetadataError::InvalidTable("Empty ID found".to_string()));
            }
            // '#' rows are comments in metadata files
            if id.starts_with('#') {
                return Err(MetadataError::InvalidTable(format!(
                    "ID '{}' cannot start with '#'",
                    id
                )));
            }
            if !seen.insert(id.as_str()) {
                duplicates.push(id.as_str());
            }
        }
        if !duplicates.is_empty() {
            return Err(MetadataError::InvalidTable(format!(
                "Duplicate IDs: {}",
                crate::error::join_sorted(duplicates)
            )));
        }

        let mut names = HashSet::new();
        for column in &columns {
            if column.name.is_empty() {
                return Err(MetadataError::InvalidTable(
                    "Column names cannot be empty".to_string(),
                ));
            }
            if column.name == id_header {
                return Err(MetadataError::InvalidTable(format!(
                    "Column name '{}' conflicts with the identifier column label",
                    column.name
                )));
            }
            if !names.insert(column.name.as_str()) {
                return Err(MetadataError::InvalidTable(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
            if column.data.len() != ids.len() {
                return Err(MetadataError::InvalidTable(format!(
                    "Column '{}' has {} values, expected {}",
                    column.name,
                    column.data.len(),
                    ids.len()
                )));
            }
        }

        // Empty text is a missing value
        for column in &mut columns {
            if let ColumnData::Categorical(values) = &mut column.data {
                for value in values.iter_mut() {
                    if value.as_deref() == Some("") {
                        *value = None;
                    }
                }
            }
        }

        Ok(Self::from_parts(id_header, ids, columns))
    }

    /// Assemble a table from parts already known to satisfy the invariants
    pub(crate) fn from_parts(id_header: String, ids: Vec<String>, columns: Vec<Column>) -> Self {
        let id_index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            id_header,
            ids,
            columns,
            id_index,
        }
    }

    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of IDs
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Row position of an ID
    pub fn position(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    pub fn column_ref(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cell value, `None` when the ID or column is absent or the cell is missing
    pub fn get(&self, id: &str, column: &str) -> Option<Value> {
        let row = self.position(id)?;
        self.column_ref(column)?.data.value(row)
    }

    /// Detach a column together with the ID sequence
    pub fn column(&self, name: &str) -> Result<MetadataColumn> {
        let column = self
            .column_ref(name)
            .ok_or_else(|| MetadataError::ColumnNotFound(name.to_string()))?;
        Ok(MetadataColumn {
            id_header: self.id_header.clone(),
            ids: self.ids.clone(),
            column: column.clone(),
        })
    }

    /// Keep only IDs passing the regex and list filters; returns a new table
    pub fn filter_ids(
        &self,
        id_include: Option<&Regex>,
        id_exclude: Option<&Regex>,
        ids_include: Option<&HashSet<String>>,
        ids_exclude: Option<&HashSet<String>>,
    ) -> Result<Self> {
        let positions: Vec<Option<usize>> = self
            .ids
            .iter()
            .enumerate()
            .filter(|(_, id)| {
                if let Some(regex) = id_include {
                    if !regex.is_match(id) {
                        return false;
                    }
                }
                if let Some(regex) = id_exclude {
                    if regex.is_match(id) {
                        return false;
                    }
                }
                if let Some(set) = ids_include {
                    if !set.contains(*id) {
                        return false;
                    }
                }
                if let Some(set) = ids_exclude {
                    if set.contains(*id) {
                        return false;
                    }
                }
                true
            })
            .map(|(i, _)| Some(i))
            .collect();

        if positions.is_empty() {
            return Err(MetadataError::InvalidTable(
                "No IDs remain after filtering".to_string(),
            ));
        }
        if positions.len() != self.ids.len() {
            log::info!(
                "ID filters: kept {} ids (removed {})",
                positions.len(),
                self.ids.len() - positions.len()
            );
        }

        let ids = positions
            .iter()
            .flatten()
            .map(|&i| self.ids[i].clone())
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: c.data.select(&positions),
            })
            .collect();
        Ok(Self::from_parts(self.id_header.clone(), ids, columns))
    }

    pub fn summary(&self) -> TableSummary {
        let n_numeric = self
            .columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
            .count();
        let missing_cells: usize = self.columns.iter().map(|c| c.data.missing_count()).sum();
        let total_cells = self.ids.len() * self.columns.len();
        let missing_percent = if total_cells == 0 {
            0.0
        } else {
            100.0 * missing_cells as f64 / total_cells as f64
        };
        let complete_ids = (0..self.ids.len())
            .filter(|&row| self.columns.iter().all(|c| !c.data.is_missing(row)))
            .count();

        TableSummary {
            n_ids: self.ids.len(),
            n_columns: self.columns.len(),
            n_numeric,
            n_categorical: self.columns.len() - n_numeric,
            missing_cells,
            missing_percent,
            complete_ids,
        }
    }
}
