// merge.rs - Merge configuration file with CLI arguments

use crate::cli::args::Command;
use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // ID filtering
        if self.include_ids.is_none() {
            self.include_ids = config.include_ids;
        }
        if self.exclude_ids.is_none() {
            self.exclude_ids = config.exclude_ids;
        }
        if self.include_ids_list.is_none() {
            self.include_ids_list = config.include_ids_list;
        }
        if self.exclude_ids_list.is_none() {
            self.exclude_ids_list = config.exclude_ids_list;
        }

        match &mut self.command {
            Some(Command::Distance(args)) => {
                if args.format.is_none() {
                    args.format = config.format;
                }
            }
            Some(Command::RandomGroups(args)) => {
                if args.n_columns.is_none() {
                    args.n_columns = config.n_columns;
                }
                if args.column_name_prefix.is_none() {
                    args.column_name_prefix = config.column_name_prefix;
                }
                if args.column_value_prefix.is_none() {
                    args.column_value_prefix = config.column_value_prefix;
                }
                if args.seed.is_none() {
                    args.seed = config.seed;
                }
                // Flags (config only sets if not explicitly set)
                if !args.encode_sample_size && config.encode_sample_size.unwrap_or(false) {
                    args.encode_sample_size = true;
                }
                if !args.preserve_labels && config.preserve_labels.unwrap_or(false) {
                    args.preserve_labels = true;
                }
            }
            Some(Command::Tabulate(args)) => {
                if args.page_size.is_none() {
                    args.page_size = config.page_size;
                }
            }
            Some(Command::Merge(_)) | None => {}
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
