// tsv.rs - Delimited text loader for metadata tables

use super::is_id_header;
use crate::data::table::{Column, ColumnKind, MetadataTable};
use crate::error::{MetadataError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Directive row declaring per-column kinds
const TYPES_DIRECTIVE: &str = "#q2:types";

/// Parse a cell as a finite number
pub(crate) fn parse_numeric(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolve one column's kind and build its data
fn build_column(name: &str, raw: Vec<Option<String>>, hint: Option<ColumnKind>) -> Result<Column> {
    match hint {
        Some(ColumnKind::Categorical) => Ok(Column::categorical(name, raw)),
        Some(ColumnKind::Numeric) => {
            let bad: Vec<&str> = raw
                .iter()
                .flatten()
                .filter(|s| parse_numeric(s).is_none())
                .map(|s| s.as_str())
                .collect();
            if !bad.is_empty() {
                return Err(MetadataError::NonNumeric {
                    column: name.to_string(),
                    values: bad.join(", "),
                });
            }
            Ok(Column::numeric(
                name,
                raw.iter().map(|v| v.as_deref().and_then(parse_numeric)).collect(),
            ))
        }
        None => {
            let parsed: Option<Vec<Option<f64>>> = raw
                .iter()
                .map(|v| match v {
                    Some(s) => parse_numeric(s).map(Some),
                    None => Some(None),
                })
                .collect();
            match parsed {
                Some(values) => Ok(Column::numeric(name, values)),
                None => Ok(Column::categorical(name, raw)),
            }
        }
    }
}

impl MetadataTable {
    /// Parse a table from any reader with the given delimiter
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(reader);

        let mut header: Option<Vec<String>> = None;
        let mut hints: Option<Vec<Option<ColumnKind>>> = None;
        let mut ids: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let cells: Vec<&str> = record.iter().collect();

            let first = match cells.first() {
                Some(first) => *first,
                None => continue,
            };
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }

            if header.is_none() {
                if first.starts_with('#') && !is_id_header(first) {
                    continue;
                }
                if !is_id_header(first) {
                    return Err(MetadataError::InvalidTable(format!(
                        "Unrecognized ID column name '{}' on line {}. Use one of: id, sample-id, feature-id, #SampleID, ...",
                        first, line
                    )));
                }
                header = Some(cells.iter().map(|s| s.to_string()).collect());
                continue;
            }
            let width = header.as_ref().map(|h| h.len()).unwrap_or(0);

            if first.to_lowercase() == TYPES_DIRECTIVE {
                if hints.is_some() || !ids.is_empty() {
                    return Err(MetadataError::InvalidTable(format!(
                        "The {} directive on line {} must directly follow the header",
                        TYPES_DIRECTIVE, line
                    )));
                }
                if cells.len() > width {
                    return Err(MetadataError::InvalidTable(format!(
                        "The {} directive on line {} has more cells than the header",
                        TYPES_DIRECTIVE, line
                    )));
                }
                let mut parsed = Vec::with_capacity(width - 1);
                for cell in cells.iter().skip(1) {
                    if cell.is_empty() {
                        parsed.push(None);
                    } else {
                        parsed.push(Some(cell.parse::<ColumnKind>()?));
                    }
                }
                parsed.resize(width - 1, None);
                hints = Some(parsed);
                continue;
            }
            if first.to_lowercase().starts_with("#q2:") {
                return Err(MetadataError::InvalidTable(format!(
                    "Unrecognized directive '{}' on line {}",
                    first, line
                )));
            }
            if first.starts_with('#') {
                continue;
            }

            if cells.len() > width {
                return Err(MetadataError::InvalidTable(format!(
                    "Line {} has {} cells, expected at most {}",
                    line,
                    cells.len(),
                    width
                )));
            }
            ids.push(first.to_string());
            rows.push(cells.iter().skip(1).map(|s| s.to_string()).collect());
        }

        let header = header.ok_or_else(|| {
            MetadataError::InvalidTable("No header row found in metadata file".to_string())
        })?;
        let hints = hints.unwrap_or_else(|| vec![None; header.len() - 1]);

        let mut columns = Vec::with_capacity(header.len() - 1);
        for (j, name) in header.iter().skip(1).enumerate() {
            let raw: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.get(j).filter(|s| !s.is_empty()).cloned())
                .collect();
            columns.push(build_column(name, raw, hints[j])?);
        }

        let id_header = header[0].clone();
        let table = Self::new(id_header, ids, columns)?;
        log::info!(
            "Parsed metadata: {} ids, {} columns",
            table.len(),
            table.n_columns()
        );
        Ok(table)
    }

    /// Load a tab-separated metadata file
    pub fn from_tsv(file_path: &Path) -> Result<Self> {
        let file = File::open(file_path).map_err(|e| MetadataError::io(file_path, e))?;
        Self::from_reader(file, b'\t')
    }
}
