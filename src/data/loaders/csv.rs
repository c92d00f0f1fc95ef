// csv.rs - Comma-separated loader for metadata tables

use crate::data::table::MetadataTable;
use crate::error::{MetadataError, Result};
use std::fs::File;
use std::path::Path;

impl MetadataTable {
    /// Load a comma-separated metadata file
    pub fn from_csv(file_path: &Path) -> Result<Self> {
        let file = File::open(file_path).map_err(|e| MetadataError::io(file_path, e))?;
        Self::from_reader(file, b',')
    }
}

#[cfg(test)]
mod tests {
    use crate::data::table::{ColumnKind, MetadataTable, Value};

    #[test]
    fn test_quoted_csv() {
        let text = "sample id,\"site, detail\",ph\ns1,\"gut, upper\",6.5\ns2,skin,7\n";
        let table = MetadataTable::from_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(table.column_names(), vec!["site, detail", "ph"]);
        assert_eq!(
            table.get("s1", "site, detail"),
            Some(Value::Categorical("gut, upper".to_string()))
        );
        assert_eq!(table.column_ref("ph").unwrap().kind(), ColumnKind::Numeric);
    }
}
