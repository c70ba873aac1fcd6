//! cocofilter: filter a COCO dataset down to a subset of categories.
//!
//! A run loads a COCO JSON document, indexes it, keeps only the annotations
//! of the requested categories (renumbered `1..=k`), drops images left
//! without annotations and writes the result, optionally split into train
//! and validation documents by image filename.
//!
//! # Modules
//!
//! - [`coco`]: Document types and JSON I/O
//! - [`index`]: Lookup indexes with duplicate-id detection
//! - [`filter`]: Category, annotation and image filtering plus the run report
//! - [`split`]: Train/validation partitioning
//! - [`pipeline`]: The end-to-end run used by the CLI
//! - [`confirm`]: Caller-supplied answers for overwrite/missing-category decisions
//! - [`error`]: Error types

pub mod coco;
pub mod confirm;
pub mod error;
pub mod filter;
pub mod index;
pub mod pipeline;
pub mod split;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use confirm::{Confirm, ConfirmFlags, ConfirmRequest};
pub use error::CocoFilterError;
pub use filter::FilterReport;
pub use pipeline::{run_filter, FilterOptions};

/// The cocofilter CLI application.
#[derive(Parser)]
#[command(name = "cocofilter")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Keep only the given categories, renumbering them from 1.
    Filter(FilterArgs),
    /// List the categories of a dataset grouped by supercategory.
    Categories(CategoriesArgs),
    /// Write a validation filename list sampled from a dataset.
    ValNames(ValNamesArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the filter subcommand.
#[derive(clap::Args)]
struct FilterArgs {
    /// Path to a COCO JSON file.
    #[arg(short = 'i', long, visible_alias = "input-json")]
    input: PathBuf,

    /// Path to save the filtered JSON (the train half when splitting).
    #[arg(short = 'o', long, visible_alias = "output-json")]
    output: PathBuf,

    /// Path to save the validation JSON. Enables the train/val split.
    #[arg(short = 'v', long, visible_alias = "val-json")]
    val_output: Option<PathBuf>,

    /// JSON array of image filenames that go to the validation split.
    #[arg(long, default_value = split::DEFAULT_VAL_NAMES_FILE)]
    val_names: PathBuf,

    /// Category names to keep, e.g. -c person dog bicycle.
    #[arg(short = 'c', long, num_args = 1.., required = true)]
    categories: Vec<String>,

    /// Continue with the matching subset when some categories are missing.
    #[arg(long)]
    allow_missing: bool,

    /// Overwrite existing output files.
    #[arg(short = 'f', long)]
    force: bool,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,

    /// Format of the summary printed on success.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

/// Arguments for the categories subcommand.
#[derive(clap::Args)]
struct CategoriesArgs {
    /// Path to a COCO JSON file.
    input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the val-names subcommand.
#[derive(clap::Args)]
struct ValNamesArgs {
    /// Path to a COCO JSON file.
    input: PathBuf,

    /// Where to write the filename list.
    #[arg(short = 'o', long, default_value = split::DEFAULT_VAL_NAMES_FILE)]
    output: PathBuf,

    /// Number of filenames to draw.
    #[arg(short = 'n', long, default_value_t = split::DEFAULT_VAL_COUNT)]
    count: usize,

    /// Seed for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,

    /// Overwrite an existing list.
    #[arg(short = 'f', long)]
    force: bool,
}

/// Run the cocofilter CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CocoFilterError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Filter(args)) => run_filter_command(args),
        Some(Commands::Categories(args)) => run_categories(args),
        Some(Commands::ValNames(args)) => run_val_names(args),
        None => {
            println!("cocofilter {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Filter a COCO dataset down to a subset of categories.");
            println!();
            println!("Run 'cocofilter --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the filter subcommand.
fn run_filter_command(args: FilterArgs) -> Result<(), CocoFilterError> {
    let opts = FilterOptions {
        input: args.input,
        output: args.output,
        val_output: args.val_output,
        val_names: args.val_names,
        categories: args.categories,
        pretty: args.pretty,
    };
    let mut confirm = ConfirmFlags {
        allow_missing: args.allow_missing,
        overwrite: args.force,
    };

    let report = run_filter(&opts, &mut confirm)?;

    match args.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|source| {
                CocoFilterError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        ReportFormat::Text => {
            println!("Filtered json saved to {}", opts.output.display());
            if let Some(val_output) = &opts.val_output {
                println!("Validation json saved to {}", val_output.display());
            }
            print!("{}", report);
        }
    }
    Ok(())
}

/// Execute the categories subcommand.
fn run_categories(args: CategoriesArgs) -> Result<(), CocoFilterError> {
    let doc = coco::read_coco_json(&args.input)?;
    let mut report = FilterReport::new();
    let index = index::DatasetIndex::build(doc, &mut report);

    let grouped = index.super_categories();
    let ungrouped: Vec<_> = index
        .categories()
        .iter()
        .filter(|c| c.supercategory().is_none())
        .collect();

    match args.output {
        ReportFormat::Json => {
            let supercategories: serde_json::Map<String, serde_json::Value> = grouped
                .iter()
                .map(|(name, ids)| {
                    let members: Vec<_> = ids
                        .iter()
                        .filter_map(|id| index.category(*id))
                        .map(|c| serde_json::json!({"id": c.id, "name": c.name}))
                        .collect();
                    (name.clone(), serde_json::Value::from(members))
                })
                .collect();
            let json = serde_json::json!({
                "category_count": index.categories().len(),
                "supercategories": supercategories,
                "ungrouped": ungrouped
                    .iter()
                    .map(|c| serde_json::json!({"id": c.id, "name": c.name}))
                    .collect::<Vec<_>>(),
            });
            println!("{:#}", json);
        }
        ReportFormat::Text => {
            println!("{} categories", index.categories().len());
            for (name, ids) in grouped {
                println!("{}:", name);
                for category in ids.iter().filter_map(|id| index.category(*id)) {
                    println!("  {:>4}  {}", category.id, category.name);
                }
            }
            if !ungrouped.is_empty() {
                println!("(no supercategory):");
                for category in ungrouped {
                    println!("  {:>4}  {}", category.id, category.name);
                }
            }
        }
    }
    Ok(())
}

/// Execute the val-names subcommand.
fn run_val_names(args: ValNamesArgs) -> Result<(), CocoFilterError> {
    if args.count == 0 {
        return Err(CocoFilterError::InvalidArgs(
            "-n must be greater than 0".to_string(),
        ));
    }

    let mut report = FilterReport::new();
    let mut confirm = ConfirmFlags {
        overwrite: args.force,
        ..Default::default()
    };
    pipeline::check_destination(&args.output, &mut confirm, &mut report)?;

    let doc = coco::read_coco_json(&args.input)?;
    let names = split::sample_val_names(&doc, args.count, args.seed);
    split::write_val_names(&args.output, &names)?;

    println!(
        "Wrote {} validation filenames to {}",
        names.len(),
        args.output.display()
    );
    Ok(())
}
