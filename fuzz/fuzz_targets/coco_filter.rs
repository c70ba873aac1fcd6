//! Fuzz target for COCO JSON parsing and filtering.
//!
//! Feeds arbitrary bytes to the COCO parser and runs every document that
//! parses through the index and filter, checking for panics.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_filter

#![no_main]

use cocofilter::coco::from_coco_slice;
use cocofilter::confirm::ConfirmFlags;
use cocofilter::filter::{filter_document, FilterReport};
use cocofilter::index::DatasetIndex;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 10MB is generous for JSON annotation files.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(doc) = from_coco_slice(data) else {
        return;
    };

    let requested: Vec<String> = doc.categories.iter().take(2).map(|c| c.name.clone()).collect();
    let mut report = FilterReport::new();
    let index = DatasetIndex::build(doc, &mut report);
    let _ = filter_document(
        &index,
        &requested,
        &mut ConfirmFlags::permissive(),
        &mut report,
    );
});
