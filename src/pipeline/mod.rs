//! The end-to-end filter run: load, index, filter, split, write.
//!
//! Everything that can fail is checked before the first byte is written:
//! input existence, destination confirmations, the validation side file
//! and serialization of every output document. A failed run leaves no
//! output behind.

use std::path::{Path, PathBuf};

use crate::coco::{read_coco_json, to_coco_vec, CocoDocument};
use crate::confirm::{Confirm, ConfirmRequest};
use crate::error::CocoFilterError;
use crate::filter::{filter_document, FilterCounts, FilterIssue, FilterReport, IssueCode};
use crate::index::DatasetIndex;
use crate::split::{read_val_names, split_by_val_names};

/// Options for one filter run.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    /// Source COCO document.
    pub input: PathBuf,
    /// Destination of the filtered document (the train half when splitting).
    pub output: PathBuf,
    /// Destination of the validation half. Setting it enables the split.
    pub val_output: Option<PathBuf>,
    /// Side file listing validation image filenames.
    pub val_names: PathBuf,
    /// Category names to keep.
    pub categories: Vec<String>,
    /// Pretty-print output JSON.
    pub pretty: bool,
}

/// Runs the filter described by `opts`.
///
/// # Errors
/// Fails without writing anything if the input is missing or malformed,
/// if `confirm` declines a missing-category or overwrite request, or if a
/// split is requested and the side file cannot be read.
pub fn run_filter(
    opts: &FilterOptions,
    confirm: &mut dyn Confirm,
) -> Result<FilterReport, CocoFilterError> {
    if opts.categories.is_empty() {
        return Err(CocoFilterError::InvalidArgs(
            "at least one category name is required".to_string(),
        ));
    }
    if opts
        .val_output
        .as_deref()
        .is_some_and(|val_output| same_destination(val_output, &opts.output))
    {
        return Err(CocoFilterError::InvalidArgs(
            "output and validation output must be different paths".to_string(),
        ));
    }
    if !opts.input.exists() {
        return Err(CocoFilterError::NotFound {
            path: opts.input.clone(),
        });
    }

    let mut report = FilterReport::new();

    check_destination(&opts.output, confirm, &mut report)?;
    if let Some(val_output) = &opts.val_output {
        check_destination(val_output, confirm, &mut report)?;
    }

    log::info!("Loading {}", opts.input.display());
    let doc = read_coco_json(&opts.input)?;
    report.input = FilterCounts::of(&doc);

    log::info!("Indexing dataset");
    let index = DatasetIndex::build(doc, &mut report);

    log::info!("Filtering to {} categories", opts.categories.len());
    let filtered = filter_document(&index, &opts.categories, confirm, &mut report)?;

    let outputs = match &opts.val_output {
        Some(val_output) => {
            let val_names = read_val_names(&opts.val_names)?;
            let split = split_by_val_names(&filtered, &val_names);
            report.output = FilterCounts::of(&split.train);
            report.val = Some(FilterCounts::of(&split.val));
            vec![
                (val_output.clone(), split.val),
                (opts.output.clone(), split.train),
            ]
        }
        None => {
            report.output = FilterCounts::of(&filtered);
            vec![(opts.output.clone(), filtered)]
        }
    };

    write_outputs(&outputs, opts.pretty)?;
    Ok(report)
}

/// True if `a` and `b` name the same file once their directories are resolved.
///
/// Outputs may not exist yet, so only the parent directories are
/// canonicalized. Falls back to comparing the paths as given when a parent
/// cannot be resolved.
fn same_destination(a: &Path, b: &Path) -> bool {
    let resolve = |path: &Path| {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Some((parent.canonicalize().ok()?, path.file_name()?.to_os_string()))
    };

    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Asks for consent if `path` exists; declining is an error.
pub fn check_destination(
    path: &Path,
    confirm: &mut dyn Confirm,
    report: &mut FilterReport,
) -> Result<(), CocoFilterError> {
    if !path.exists() {
        return Ok(());
    }
    if !confirm.confirm(&ConfirmRequest::OverwriteOutput(path)) {
        return Err(CocoFilterError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    report.add(FilterIssue::warning(
        IssueCode::OutputOverwritten,
        format!("Overwriting existing file {}", path.display()),
    ));
    Ok(())
}

/// Serializes every document, then writes them all.
///
/// A serialization failure aborts before any file is touched.
pub fn write_outputs(
    outputs: &[(PathBuf, CocoDocument)],
    pretty: bool,
) -> Result<(), CocoFilterError> {
    let encoded = outputs
        .iter()
        .map(|(path, doc)| {
            to_coco_vec(doc, pretty)
                .map(|bytes| (path, bytes))
                .map_err(|source| CocoFilterError::Write {
                    path: path.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (path, bytes) in encoded {
        log::info!("Saving {}", path.display());
        std::fs::write(path, bytes)?;
    }
    Ok(())
}
