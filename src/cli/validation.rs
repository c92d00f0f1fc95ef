// validation.rs - Input validation utilities

use crate::cli::args::{Args, Command};
use crate::core::{GroupPolicy, RandomGroupsOptions};
use crate::core::random::{
    DEFAULT_COLUMN_NAME_PREFIX, DEFAULT_COLUMN_VALUE_PREFIX, DEFAULT_N_COLUMNS,
};
use crate::error::{MetadataError, Result};
use crate::output::tabulate::{validate_page_size, DEFAULT_PAGE_SIZE};
use crate::output::MATRIX_FORMATS;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub struct ValidationResult {
    pub id_include_regex: Option<Regex>,
    pub id_exclude_regex: Option<Regex>,
    pub ids_include_set: Option<HashSet<String>>,
    pub ids_exclude_set: Option<HashSet<String>>,
    /// Lowercased distance matrix format
    pub format: String,
    pub random_groups: RandomGroupsOptions,
    pub page_size: usize,
}

impl ValidationResult {
    pub fn has_id_filters(&self) -> bool {
        self.id_include_regex.is_some()
            || self.id_exclude_regex.is_some()
            || self.ids_include_set.is_some()
            || self.ids_exclude_set.is_some()
    }
}

fn compile(pattern: &Option<String>) -> Result<Option<Regex>> {
    pattern.as_deref().map(Regex::new).transpose().map_err(MetadataError::from)
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult> {
    let mut format = "tsv".to_string();
    let mut random_groups = RandomGroupsOptions::default();
    let mut page_size = DEFAULT_PAGE_SIZE as usize;

    match &args.command {
        Some(Command::Merge(merge)) => {
            if merge.input.is_empty() {
                return Err(MetadataError::Configuration(
                    "merge requires at least one --input table".to_string(),
                ));
            }
        }
        Some(Command::Distance(distance)) => {
            format = distance
                .format
                .as_deref()
                .unwrap_or("tsv")
                .to_lowercase();
            if !MATRIX_FORMATS.contains(&format.as_str()) {
                return Err(MetadataError::Configuration(format!(
                    "Invalid format '{}'. Use: {}",
                    format,
                    MATRIX_FORMATS.join(", ")
                )));
            }
        }
        Some(Command::RandomGroups(rg)) => {
            let n_columns = rg.n_columns.unwrap_or(DEFAULT_N_COLUMNS);
            if n_columns == 0 {
                return Err(MetadataError::Configuration(
                    "--n-columns must be at least 1".to_string(),
                ));
            }
            random_groups = RandomGroupsOptions {
                n_columns,
                column_name_prefix: rg
                    .column_name_prefix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COLUMN_NAME_PREFIX.to_string()),
                column_value_prefix: rg
                    .column_value_prefix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COLUMN_VALUE_PREFIX.to_string()),
                encode_sample_size: rg.encode_sample_size,
                policy: if rg.preserve_labels {
                    GroupPolicy::PreserveLabels
                } else {
                    GroupPolicy::FreshLabels
                },
            };
        }
        Some(Command::Tabulate(tab)) => {
            if tab.input.is_empty() {
                return Err(MetadataError::Configuration(
                    "tabulate requires at least one --input table".to_string(),
                ));
            }
            page_size = validate_page_size(tab.page_size.unwrap_or(DEFAULT_PAGE_SIZE))?;
        }
        None => {}
    }

    // Compile regex patterns
    let id_include_regex = compile(&args.include_ids)?;
    let id_exclude_regex = compile(&args.exclude_ids)?;

    // Load filter sets from files
    let ids_include_set = args
        .include_ids_list
        .as_deref()
        .map(load_set_from_file)
        .transpose()?;
    let ids_exclude_set = args
        .exclude_ids_list
        .as_deref()
        .map(load_set_from_file)
        .transpose()?;

    Ok(ValidationResult {
        id_include_regex,
        id_exclude_regex,
        ids_include_set,
        ids_exclude_set,
        format,
        random_groups,
        page_size,
    })
}

/// Load a set of strings from a file (one per line)
pub fn load_set_from_file(file_path: &str) -> Result<HashSet<String>> {
    let io = |e: std::io::Error| MetadataError::io(file_path, e);
    let file = File::open(file_path).map_err(io)?;

    let reader = BufReader::new(file);
    let mut set = HashSet::new();

    for line in reader.lines() {
        let line = line.map_err(io)?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            set.insert(trimmed.to_string());
        }
    }

    log::info!("Loaded {} ids from filter file '{}'", set.len(), file_path);
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["metatab"], args).unwrap()
    }

    #[test]
    fn test_distance_format() {
        let ok = parse(&["distance", "--input", "a.tsv", "--column", "x", "--output", "o", "--format", "PHYLIP"]);
        assert_eq!(validate_args(&ok).unwrap().format, "phylip");

        let bad = parse(&["distance", "--input", "a.tsv", "--column", "x", "--output", "o", "--format", "xml"]);
        assert!(matches!(validate_args(&bad), Err(MetadataError::Configuration(_))));
    }

    #[test]
    fn test_page_size_and_n_columns() {
        let bad_page = parse(&["tabulate", "--input", "a.tsv", "--output-dir", "d", "--page-size", "0"]);
        assert!(matches!(validate_args(&bad_page), Err(MetadataError::Configuration(_))));

        let default_page = parse(&["tabulate", "--input", "a.tsv", "--output-dir", "d"]);
        assert_eq!(validate_args(&default_page).unwrap().page_size, 100);

        let bad_cols = parse(&["random-groups", "--input", "a", "--column", "g", "--output", "o", "--n-columns", "0"]);
        assert!(validate_args(&bad_cols).is_err());

        let preserve = parse(&["random-groups", "--input", "a", "--column", "g", "--output", "o", "--preserve-labels"]);
        let options = validate_args(&preserve).unwrap().random_groups;
        assert_eq!(options.policy, GroupPolicy::PreserveLabels);
        assert_eq!(options.n_columns, 3);
    }

    #[test]
    fn test_id_filters() {
        let mut list = NamedTempFile::new().unwrap();
        writeln!(list, "s1\n\n  s2  ").unwrap();
        let path = list.path().to_str().unwrap().to_string();

        let args = parse(&["--include-ids-list", path.as_str(), "--exclude-ids", "^ctl", "merge", "--input", "a", "--output", "o"]);
        let result = validate_args(&args).unwrap();
        assert!(result.has_id_filters());
        let set = result.ids_include_set.unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("s2"));
        assert!(result.id_exclude_regex.unwrap().is_match("ctl-3"));

        let bad = parse(&["--include-ids", "(", "merge", "--input", "a", "--output", "o"]);
        assert!(matches!(validate_args(&bad), Err(MetadataError::Regex(_))));
    }
}
