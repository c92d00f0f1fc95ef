// main.rs - CLI entry point

use metatab::cli::args::{DistanceArgs, MergeArgs, RandomGroupsArgs, TabulateArgs};
use metatab::cli::Config;
use metatab::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MetadataError> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        if let Some(config_path) = &args.config {
            Config::write_sample(config_path)?;
            println!("📄 Sample configuration written to: {}", config_path);
        } else {
            println!("{}", Config::generate_sample());
            println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        }
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
        println!("📄 Loaded configuration from: {}", config_path);
    }

    let Some(command) = args.command.as_ref() else {
        return Err(MetadataError::Configuration(
            "a subcommand is required: merge, distance, random-groups, tabulate (see --help)"
                .to_string(),
        ));
    };

    println!("🚀 metatab v{} ({})", VERSION, command.name());

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| {
                MetadataError::Configuration(format!("Failed to configure thread pool: {}", e))
            })?;
        println!("🧵 Threads: {}", n);
    } else {
        println!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    // Validate all arguments
    let validation = validate_args(&args)?;
    let total_start = Instant::now();

    let output = match command {
        Command::Merge(merge_args) => run_merge(merge_args, &validation)?,
        Command::Distance(distance_args) => {
            run_distance(distance_args, &validation, &command_line)?
        }
        Command::RandomGroups(rg_args) => run_random_groups(rg_args, &validation)?,
        Command::Tabulate(tab_args) => run_tabulate(tab_args, &validation)?,
    };

    println!("\n🎉 === METATAB COMPLETED SUCCESSFULLY ===");
    println!(
        "⏱️  Total execution time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    println!("📁 Output written to: {}", output);
    println!("🔧 Command: {}", command_line);
    Ok(())
}

/// Load a table, apply the global ID filters and report what was loaded
fn load_table(path: &str, validation: &ValidationResult) -> Result<MetadataTable, MetadataError> {
    let table = MetadataTable::from_file(Path::new(path))?;
    let summary = table.summary();
    println!(
        "📊 Loaded {}: {} ids × {} columns ({} numeric, {} categorical, {:.1}% missing)",
        path,
        summary.n_ids,
        summary.n_columns,
        summary.n_numeric,
        summary.n_categorical,
        summary.missing_percent
    );

    if !validation.has_id_filters() {
        return Ok(table);
    }
    let filtered = table.filter_ids(
        validation.id_include_regex.as_ref(),
        validation.id_exclude_regex.as_ref(),
        validation.ids_include_set.as_ref(),
        validation.ids_exclude_set.as_ref(),
    )?;
    if filtered.len() != table.len() {
        println!(
            "🔍 ID filters: kept {} of {} ids",
            filtered.len(),
            table.len()
        );
    }
    Ok(filtered)
}

fn load_and_merge(inputs: &[String], validation: &ValidationResult) -> Result<MetadataTable, MetadataError> {
    let tables = inputs
        .iter()
        .map(|path| load_table(path, validation))
        .collect::<Result<Vec<_>, _>>()?;
    if tables.len() > 1 {
        println!("🔄 Merging {} tables...", tables.len());
    }
    merge_all(&tables)
}

fn run_merge(args: &MergeArgs, validation: &ValidationResult) -> Result<String, MetadataError> {
    let merged = load_and_merge(&args.input, validation)?;
    let summary = merged.summary();
    println!(
        "✅ Merged table: {} ids × {} columns ({} ids complete)",
        summary.n_ids, summary.n_columns, summary.complete_ids
    );
    write_table(&args.output, &merged)?;
    Ok(args.output.clone())
}

fn run_distance(
    args: &DistanceArgs,
    validation: &ValidationResult,
    command_line: &str,
) -> Result<String, MetadataError> {
    let table = load_table(&args.input, validation)?;
    let column = table.column(&args.column)?;

    println!("\n🔄 Computing distance matrix for '{}'...", args.column);
    let start = Instant::now();
    let matrix = distance_matrix(&column)?;
    println!(
        "✅ Distance matrix: {} × {} in {:.2}s",
        matrix.len(),
        matrix.len(),
        start.elapsed().as_secs_f64()
    );

    write_matrix(&args.output, &validation.format, &matrix, command_line)?;
    Ok(args.output.clone())
}

fn run_random_groups(
    args: &RandomGroupsArgs,
    validation: &ValidationResult,
) -> Result<String, MetadataError> {
    let table = load_table(&args.input, validation)?;
    let column = table.column(&args.column)?;

    let mut rng = match args.seed {
        Some(seed) => {
            println!("🎲 Seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let options = &validation.random_groups;
    let groups = random_groups(&column, options, &mut rng)?;
    println!(
        "✅ Created {} random groupings from '{}' ({} ids)",
        groups.n_columns(),
        args.column,
        groups.len()
    );

    write_table(&args.output, &groups)?;
    Ok(args.output.clone())
}

fn run_tabulate(args: &TabulateArgs, validation: &ValidationResult) -> Result<String, MetadataError> {
    let table = load_and_merge(&args.input, validation)?;
    tabulate(&table, validation.page_size as i64, Path::new(&args.output_dir))?;
    println!(
        "✅ Rendered {} ids, {} per page",
        table.len(),
        validation.page_size
    );
    Ok(Path::new(&args.output_dir).join("index.html").display().to_string())
}
