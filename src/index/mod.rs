//! Lookup indexes built from a raw COCO document.
//!
//! Building the index is the only place duplicate ids are detected: the
//! first record with a given id wins and every later one is reported and
//! dropped.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde_json::Value;

use crate::coco::{Annotation, Category, CategoryId, CocoDocument, Image, ImageId};
use crate::filter::{FilterIssue, FilterReport, IssueCode};

/// Indexes over one source document, owned by a single filter run.
#[derive(Clone, Debug, Default)]
pub struct DatasetIndex {
    /// Passed through to every output document.
    pub info: Value,
    /// Passed through to every output document.
    pub licenses: Value,
    categories: Vec<Category>,
    category_positions: HashMap<CategoryId, usize>,
    super_categories: BTreeMap<String, BTreeSet<CategoryId>>,
    images: BTreeMap<ImageId, Image>,
    segmentations_by_image: BTreeMap<ImageId, Vec<Annotation>>,
}

impl DatasetIndex {
    /// Builds all indexes in a single pass over each collection.
    pub fn build(doc: CocoDocument, report: &mut FilterReport) -> Self {
        let CocoDocument {
            info,
            licenses,
            images,
            annotations,
            categories,
        } = doc;

        let mut index = DatasetIndex {
            info,
            licenses,
            ..Default::default()
        };

        for category in categories {
            if let Some(supercategory) = category.supercategory() {
                index
                    .super_categories
                    .entry(supercategory.to_string())
                    .or_default()
                    .insert(category.id);
            }

            if index.category_positions.contains_key(&category.id) {
                report.add(FilterIssue::warning(
                    IssueCode::DuplicateCategoryId,
                    format!(
                        "Skipping duplicate category id {} ('{}')",
                        category.id, category.name
                    ),
                ));
                continue;
            }
            index
                .category_positions
                .insert(category.id, index.categories.len());
            index.categories.push(category);
        }

        for image in images {
            if index.images.contains_key(&image.id) {
                report.add(FilterIssue::warning(
                    IssueCode::DuplicateImageId,
                    format!(
                        "Skipping duplicate image id {} ({})",
                        image.id,
                        image.path().unwrap_or("<no path>")
                    ),
                ));
                continue;
            }
            index.images.insert(image.id, image);
        }

        for annotation in annotations {
            index
                .segmentations_by_image
                .entry(annotation.image_id)
                .or_default()
                .push(annotation);
        }

        log::debug!(
            "indexed {} categories ({} supercategories), {} images, annotations for {} images",
            index.categories.len(),
            index.super_categories.len(),
            index.images.len(),
            index.segmentations_by_image.len()
        );

        index
    }

    /// Categories in source order, duplicates removed.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by id.
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.category_positions
            .get(&id)
            .map(|&pos| &self.categories[pos])
    }

    /// Distinct names of all indexed categories.
    pub fn category_names(&self) -> HashSet<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Supercategory name to the ids of the categories that share it.
    pub fn super_categories(&self) -> &BTreeMap<String, BTreeSet<CategoryId>> {
        &self.super_categories
    }

    /// Looks up an image by id.
    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(&id)
    }

    /// Images in ascending id order.
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.images.values()
    }

    /// Annotations grouped by image id, ascending; source order within a group.
    pub fn segmentations_by_image(&self) -> impl Iterator<Item = (ImageId, &[Annotation])> {
        self.segmentations_by_image
            .iter()
            .map(|(id, anns)| (*id, anns.as_slice()))
    }
}
