// mod.rs - Output formatters module

pub mod tabulate;

use crate::core::DistanceMatrix;
use crate::data::MetadataTable;
use crate::error::{MetadataError, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use tabulate::{serialize_table, tabulate, tabulate_with, HtmlRenderer, TableRenderer};

/// Supported distance matrix formats
pub const MATRIX_FORMATS: &[&str] = &["tsv", "csv", "phylip", "nexus"];

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| MetadataError::io(parent, e))?;
        }
    }
    Ok(())
}

fn create_writer(file_path: &str) -> Result<BufWriter<File>> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path).map_err(|e| MetadataError::io(file_path, e))?;
    Ok(BufWriter::new(file))
}

fn generated_at() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Write distance matrix as a delimited square table with a comment header
fn write_delimited(
    file_path: &str,
    matrix: &DistanceMatrix,
    command_line: &str,
    delimiter: char,
) -> Result<()> {
    let io = |e: std::io::Error| MetadataError::io(file_path, e);
    let mut writer = create_writer(file_path)?;

    // Write command header
    writeln!(writer, "# Command: {}", command_line).map_err(io)?;
    writeln!(writer, "# Generated: {}", generated_at()).map_err(io)?;
    writeln!(writer, "# metatab v{}", env!("CARGO_PKG_VERSION")).map_err(io)?;

    // Write header
    write!(writer, "Sample").map_err(io)?;
    for id in matrix.ids() {
        write!(writer, "{}{}", delimiter, id).map_err(io)?;
    }
    writeln!(writer).map_err(io)?;

    // Write matrix
    for (id, row) in matrix.ids().iter().zip(matrix.data()) {
        write!(writer, "{}", id).map_err(io)?;
        for distance in row {
            write!(writer, "{}{}", delimiter, distance).map_err(io)?;
        }
        writeln!(writer).map_err(io)?;
    }

    writer.flush().map_err(io)?;
    log::info!("Distance matrix written to: {}", file_path);
    Ok(())
}

/// Write distance matrix in TSV format
pub fn write_tsv(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<()> {
    write_delimited(file_path, matrix, command_line, '\t')
}

/// Write distance matrix in CSV format
pub fn write_csv(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<()> {
    write_delimited(file_path, matrix, command_line, ',')
}

/// Write distance matrix in PHYLIP format
pub fn write_phylip(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<()> {
    let io = |e: std::io::Error| MetadataError::io(file_path, e);
    let mut writer = create_writer(file_path)?;

    writeln!(writer, "    {}", matrix.len()).map_err(io)?;

    // Lower triangle
    for (i, (id, row)) in matrix.ids().iter().zip(matrix.data()).enumerate() {
        write!(writer, "{:<10}", id).map_err(io)?;
        for distance in row.iter().take(i + 1) {
            write!(writer, "  {}", distance).map_err(io)?;
        }
        writeln!(writer).map_err(io)?;
    }

    // Trailing comments, ignored by most PHYLIP parsers
    writeln!(writer).map_err(io)?;
    writeln!(writer, "# Command: {}", command_line).map_err(io)?;
    writeln!(writer, "# Generated: {}", generated_at()).map_err(io)?;
    writeln!(writer, "# metatab v{}", env!("CARGO_PKG_VERSION")).map_err(io)?;

    writer.flush().map_err(io)?;
    log::info!("Distance matrix written to: {} (PHYLIP format)", file_path);
    Ok(())
}

/// Write distance matrix in NEXUS format
pub fn write_nexus(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<()> {
    let io = |e: std::io::Error| MetadataError::io(file_path, e);
    let mut writer = create_writer(file_path)?;

    writeln!(writer, "#NEXUS").map_err(io)?;
    writeln!(writer, "[Command: {}]", command_line).map_err(io)?;
    writeln!(writer, "[Generated: {}]", generated_at()).map_err(io)?;
    writeln!(writer, "[metatab v{}]", env!("CARGO_PKG_VERSION")).map_err(io)?;
    writeln!(writer, "BEGIN DISTANCES;").map_err(io)?;
    writeln!(writer, "    DIMENSIONS NTAX={};", matrix.len()).map_err(io)?;
    writeln!(writer, "    FORMAT LABELS LOWER DIAGONAL;").map_err(io)?;
    writeln!(writer, "    MATRIX").map_err(io)?;

    for (i, (id, row)) in matrix.ids().iter().zip(matrix.data()).enumerate() {
        write!(writer, "        {}", id).map_err(io)?;
        for distance in row.iter().take(i) {
            write!(writer, " {}", distance).map_err(io)?;
        }
        writeln!(writer).map_err(io)?;
    }

    writeln!(writer, "    ;").map_err(io)?;
    writeln!(writer, "END;").map_err(io)?;

    writer.flush().map_err(io)?;
    log::info!("Distance matrix written to: {} (NEXUS format)", file_path);
    Ok(())
}

/// Write distance matrix in the specified format
pub fn write_matrix(
    file_path: &str,
    format: &str,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<()> {
    match format.to_lowercase().as_str() {
        "tsv" => write_tsv(file_path, matrix, command_line),
        "csv" => write_csv(file_path, matrix, command_line),
        "phylip" => write_phylip(file_path, matrix, command_line),
        "nexus" => write_nexus(file_path, matrix, command_line),
        _ => Err(MetadataError::Configuration(format!(
            "Unsupported output format: {}. Use: {}",
            format,
            MATRIX_FORMATS.join(", ")
        ))),
    }
}

/// Write a metadata table as TSV with a `#q2:types` row
pub fn write_table(file_path: &str, table: &MetadataTable) -> Result<()> {
    let writer = create_writer(file_path)?;
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    let mut header = vec![table.id_header().to_string()];
    header.extend(table.column_names().into_iter().map(String::from));
    wtr.write_record(&header)?;

    let mut types = vec!["#q2:types".to_string()];
    types.extend(table.columns().iter().map(|c| c.kind().to_string()));
    wtr.write_record(&types)?;

    let cells: Vec<Vec<Option<String>>> =
        table.columns().iter().map(|c| c.data.to_strings()).collect();
    for (row, id) in table.ids().iter().enumerate() {
        let mut record = vec![id.clone()];
        record.extend(cells.iter().map(|col| col[row].clone().unwrap_or_default()));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| MetadataError::io(file_path, e))?;
    log::info!("Metadata table written to: {}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance_matrix;
    use crate::data::{Column, MetadataColumn};
    use tempfile::tempdir;

    fn matrix() -> DistanceMatrix {
        let column = MetadataColumn::new(
            "id",
            vec!["s1".into(), "s2".into(), "s3".into()],
            Column::numeric("n", vec![Some(1.0), Some(2.5), Some(4.0)]),
        )
        .unwrap();
        distance_matrix(&column).unwrap()
    }

    #[test]
    fn test_write_tsv_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dm.tsv");
        let path = path.to_str().unwrap();
        write_matrix(path, "TSV", &matrix(), "metatab distance").unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(lines[0], "Sample\ts1\ts2\ts3");
        assert_eq!(lines[1], "s1\t0\t1.5\t3");
        assert_eq!(lines[3], "s3\t3\t1.5\t0");
        assert!(content.contains("# Command: metatab distance"));
    }

    #[test]
    fn test_write_phylip_and_nexus() {
        let dir = tempdir().unwrap();
        let phylip = dir.path().join("dm.phy");
        write_matrix(phylip.to_str().unwrap(), "phylip", &matrix(), "cmd").unwrap();
        let content = std::fs::read_to_string(&phylip).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("    3"));
        assert_eq!(lines.next(), Some("s1          0"));

        let nexus = dir.path().join("dm.nex");
        write_matrix(nexus.to_str().unwrap(), "nexus", &matrix(), "cmd").unwrap();
        let content = std::fs::read_to_string(&nexus).unwrap();
        assert!(content.starts_with("#NEXUS"));
        assert!(content.contains("DIMENSIONS NTAX=3;"));
        assert!(content.contains("        s3 3 1.5\n"));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dm.xyz");
        assert!(matches!(
            write_matrix(path.to_str().unwrap(), "xyz", &matrix(), "cmd"),
            Err(MetadataError::Configuration(_))
        ));
    }

    #[test]
    fn test_write_table_round_trip() {
        let table = MetadataTable::new(
            "sample-id",
            vec!["a".into(), "b".into()],
            vec![
                Column::categorical("code", vec![Some("1".into()), None]),
                Column::numeric("depth", vec![None, Some(2.5)]),
            ],
        )
        .unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.tsv");
        write_table(path.to_str().unwrap(), &table).unwrap();

        let reloaded = MetadataTable::from_file(&path).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_write_table_keeps_every_row() {
        let table = MetadataTable::new(
            "id",
            vec!["s1".into(), "s2".into()],
            vec![Column::categorical("g", vec![Some("a".into()), Some("".into())])],
        )
        .unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.tsv");
        write_table(path.to_str().unwrap(), &table).unwrap();

        let reloaded = MetadataTable::from_file(&path).unwrap();
        assert_eq!(reloaded.ids(), table.ids());
        assert_eq!(reloaded, table);

        assert!(MetadataTable::new("id", vec!["#s1".into(), "s2".into()], vec![]).is_err());
    }
}
