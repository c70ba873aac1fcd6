#![allow(dead_code)]

use cocofilter::coco::{Annotation, Category, CocoDocument, Image};
use cocofilter::confirm::ConfirmFlags;
use cocofilter::filter::{filter_document, FilterReport};
use cocofilter::index::DatasetIndex;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const CATEGORY_NAMES: &[&str] = &["person", "dog", "cat", "car", "bicycle"];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Documents with small id ranges so duplicate ids, shared names and
/// dangling references all show up regularly.
pub fn arb_document() -> impl Strategy<Value = CocoDocument> {
    (
        proptest::collection::vec((0u64..8, 0usize..CATEGORY_NAMES.len()), 0..8),
        proptest::collection::vec(0u64..12, 0..12),
        proptest::collection::vec((0u64..14, 0u64..9), 0..30),
    )
        .prop_map(|(categories, images, annotations)| CocoDocument {
            categories: categories
                .into_iter()
                .map(|(id, name)| Category::new(id, CATEGORY_NAMES[name]))
                .collect(),
            images: images
                .into_iter()
                .map(|id| Image::new(id, format!("imgs/{id}.jpg")))
                .collect(),
            annotations: annotations
                .into_iter()
                .enumerate()
                .map(|(n, (image_id, category_id))| {
                    Annotation::new(image_id, category_id).with_field("id", n as u64)
                })
                .collect(),
            ..Default::default()
        })
}

/// A non-empty subset of the category name pool.
pub fn arb_requested() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(CATEGORY_NAMES.to_vec(), 1..=CATEGORY_NAMES.len())
        .prop_map(|names| names.into_iter().map(str::to_string).collect())
}

/// Index and filter a document, accepting missing categories.
pub fn filter(doc: CocoDocument, requested: &[String]) -> CocoDocument {
    let mut report = FilterReport::new();
    let index = DatasetIndex::build(doc, &mut report);
    filter_document(&index, requested, &mut ConfirmFlags::permissive(), &mut report)
        .expect("permissive filter never aborts")
}
