//! Category filtering over an indexed COCO document.
//!
//! Each step is a free function over the [`DatasetIndex`]:
//!
//! 1. [`filter_categories`] remaps the requested categories to dense ids.
//! 2. [`filter_annotations`] keeps annotations of those categories.
//! 3. [`filter_images`] keeps the images those annotations point at.
//!
//! [`filter_document`] runs the three in order and assembles the output.

mod report;

pub use report::{FilterCounts, FilterIssue, FilterReport, IssueCode};

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::coco::{Annotation, Category, CategoryId, CocoDocument, Image, ImageId};
use crate::confirm::{Confirm, ConfirmRequest};
use crate::error::CocoFilterError;
use crate::index::DatasetIndex;

/// Result of filtering the category collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryFilter {
    /// Original id to new id, for every retained category.
    pub category_map: HashMap<CategoryId, CategoryId>,
    /// Retained categories with their new ids, in source order.
    pub categories: Vec<Category>,
    /// Requested names with no matching category, in request order.
    pub missing: Vec<String>,
}

/// Annotations that survived filtering and the images they reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationFilter {
    pub annotations: Vec<Annotation>,
    pub retained_images: BTreeSet<ImageId>,
}

/// Requested names that match no indexed category, deduplicated.
pub fn missing_categories(index: &DatasetIndex, requested: &[String]) -> Vec<String> {
    let known = index.category_names();
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Remaps the requested categories to ids `1..=k`.
///
/// New ids follow the order categories appear in the source document, not
/// the order of `requested`. Categories sharing a name are all kept.
/// Missing names are reported as warnings and returned in
/// [`CategoryFilter::missing`]; deciding whether to go on is up to the caller.
pub fn filter_categories(
    index: &DatasetIndex,
    requested: &[String],
    report: &mut FilterReport,
) -> CategoryFilter {
    let missing = missing_categories(index, requested);
    for name in &missing {
        report.add(FilterIssue::warning(
            IssueCode::MissingCategory,
            format!("Category '{}' not found in dataset", name),
        ));
    }

    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let mut category_map = HashMap::new();
    let mut categories = Vec::new();
    for category in index.categories() {
        if !wanted.contains(category.name.as_str()) {
            continue;
        }
        let new_id = CategoryId::new(categories.len() as u64 + 1);
        category_map.insert(category.id, new_id);
        categories.push(Category {
            id: new_id,
            ..category.clone()
        });
    }

    CategoryFilter {
        category_map,
        categories,
        missing,
    }
}

/// Keeps annotations whose category was retained, rewriting `category_id`.
///
/// Walks the image groups in index order. An image id enters
/// `retained_images` only if at least one of its annotations survives.
/// Annotations pointing at an image id the document does not define are
/// dropped and reported once per image id.
pub fn filter_annotations(
    index: &DatasetIndex,
    category_map: &HashMap<CategoryId, CategoryId>,
    report: &mut FilterReport,
) -> AnnotationFilter {
    let mut out = AnnotationFilter::default();

    for (image_id, segmentations) in index.segmentations_by_image() {
        let mut kept: Vec<Annotation> = segmentations
            .iter()
            .filter_map(|ann| {
                category_map.get(&ann.category_id).map(|&new_id| Annotation {
                    category_id: new_id,
                    ..ann.clone()
                })
            })
            .collect();

        if kept.is_empty() {
            continue;
        }

        if index.image(image_id).is_none() {
            report.add(FilterIssue::warning(
                IssueCode::DanglingImageRef,
                format!(
                    "Dropping {} annotation(s) referencing unknown image id {}",
                    kept.len(),
                    image_id
                ),
            ));
            continue;
        }

        out.annotations.append(&mut kept);
        out.retained_images.insert(image_id);
    }

    out
}

/// Projects retained image ids to their records, in ascending id order.
pub fn filter_images(index: &DatasetIndex, retained: &BTreeSet<ImageId>) -> Vec<Image> {
    retained
        .iter()
        .filter_map(|id| index.image(*id))
        .cloned()
        .collect()
}

/// Runs the full filter over an index and builds the output document.
///
/// # Errors
/// Returns [`CocoFilterError::MissingCategories`] if some requested names
/// are missing and `confirm` declines to go on.
pub fn filter_document(
    index: &DatasetIndex,
    requested: &[String],
    confirm: &mut dyn Confirm,
    report: &mut FilterReport,
) -> Result<CocoDocument, CocoFilterError> {
    let categories = filter_categories(index, requested, report);

    if !categories.missing.is_empty()
        && !confirm.confirm(&ConfirmRequest::MissingCategories(&categories.missing))
    {
        return Err(CocoFilterError::MissingCategories {
            missing: categories.missing,
        });
    }

    let annotations = filter_annotations(index, &categories.category_map, report);
    let images = filter_images(index, &annotations.retained_images);

    Ok(CocoDocument {
        info: index.info.clone(),
        licenses: index.licenses.clone(),
        images,
        annotations: annotations.annotations,
        categories: categories.categories,
    })
}
