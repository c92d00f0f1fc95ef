// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// metatab - Merge, compare, randomize and tabulate sample metadata tables
pub struct Args {
    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration (written to --config when given) and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// include only ids matching regex pattern
    #[argh(option)]
    pub include_ids: Option<String>,

    /// exclude ids matching regex pattern
    #[argh(option)]
    pub exclude_ids: Option<String>,

    /// include only ids listed in a file (one id per line)
    #[argh(option)]
    pub include_ids_list: Option<String>,

    /// exclude ids listed in a file (one id per line)
    #[argh(option)]
    pub exclude_ids_list: Option<String>,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Merge(MergeArgs),
    Distance(DistanceArgs),
    RandomGroups(RandomGroupsArgs),
    Tabulate(TabulateArgs),
}

#[derive(FromArgs)]
/// Merge two or more metadata tables into one
#[argh(subcommand, name = "merge")]
pub struct MergeArgs {
    /// metadata table (.tsv or .csv); repeat for each table
    #[argh(option)]
    pub input: Vec<String>,

    /// output metadata file (TSV)
    #[argh(option)]
    pub output: String,
}

#[derive(FromArgs)]
/// Pairwise absolute-difference distance matrix from a numeric column
#[argh(subcommand, name = "distance")]
pub struct DistanceArgs {
    /// metadata table (.tsv or .csv)
    #[argh(option)]
    pub input: String,

    /// numeric column to compare
    #[argh(option)]
    pub column: String,

    /// output distance matrix file
    #[argh(option)]
    pub output: String,

    /// output format: tsv, csv, phylip, nexus (default: tsv)
    #[argh(option)]
    pub format: Option<String>,
}

#[derive(FromArgs)]
/// Shuffled groupings preserving the group sizes of a categorical column
#[argh(subcommand, name = "random-groups")]
pub struct RandomGroupsArgs {
    /// metadata table (.tsv or .csv)
    #[argh(option)]
    pub input: String,

    /// categorical column defining the groups
    #[argh(option)]
    pub column: String,

    /// output metadata file (TSV)
    #[argh(option)]
    pub output: String,

    /// number of random groupings to create (default: 3)
    #[argh(option)]
    pub n_columns: Option<usize>,

    /// prefix for output column names (default: random-grouping-)
    #[argh(option)]
    pub column_name_prefix: Option<String>,

    /// prefix for synthetic group labels (default: fake-group-)
    #[argh(option)]
    pub column_value_prefix: Option<String>,

    /// append the group size to each synthetic label
    #[argh(switch)]
    pub encode_sample_size: bool,

    /// keep original category values instead of synthetic labels
    #[argh(switch)]
    pub preserve_labels: bool,

    /// random seed for reproducible groupings
    #[argh(option)]
    pub seed: Option<u64>,
}

#[derive(FromArgs)]
/// Render metadata as a paginated, sortable HTML table
#[argh(subcommand, name = "tabulate")]
pub struct TabulateArgs {
    /// metadata table (.tsv or .csv); repeated inputs are merged first
    #[argh(option)]
    pub input: Vec<String>,

    /// output directory for index.html and assets
    #[argh(option)]
    pub output_dir: String,

    /// records per page (default: 100)
    #[argh(option)]
    pub page_size: Option<i64>,
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Merge(_) => "merge",
            Command::Distance(_) => "distance",
            Command::RandomGroups(_) => "random-groups",
            Command::Tabulate(_) => "tabulate",
        }
    }
}
