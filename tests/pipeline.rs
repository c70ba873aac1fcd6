//! End-to-end runs of the filter pipeline through the library API.

use std::fs;
use std::path::Path;

use cocofilter::coco::{read_coco_json, write_coco_json, Annotation, Category, CocoDocument, Image};
use cocofilter::filter::IssueCode;
use cocofilter::{run_filter, CocoFilterError, ConfirmFlags, ConfirmRequest, FilterOptions};

mod common;
use common::{copy_fixture, DUPLICATE_IDS};

fn options(dir: &Path, input: &Path, categories: &[&str]) -> FilterOptions {
    FilterOptions {
        input: input.to_path_buf(),
        output: dir.join("out.json"),
        val_output: None,
        val_names: dir.join("val_names.json"),
        categories: categories.iter().map(|s| s.to_string()).collect(),
        pretty: true,
    }
}

fn write_doc(dir: &Path, doc: &CocoDocument) -> std::path::PathBuf {
    let path = dir.join("in.json");
    write_coco_json(&path, doc, false).expect("write input");
    path
}

#[test]
fn dog_and_cat_are_renumbered_in_source_order() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = write_doc(
        temp.path(),
        &CocoDocument {
            categories: vec![
                Category::new(1u64, "person"),
                Category::new(2u64, "dog"),
                Category::new(3u64, "cat"),
            ],
            images: vec![Image::new(10u64, "a/x.jpg")],
            annotations: vec![Annotation::new(10u64, 2u64)],
            ..Default::default()
        },
    );
    let opts = options(temp.path(), &input, &["dog", "cat"]);

    run_filter(&opts, &mut ConfirmFlags::default()).expect("run");

    let out = read_coco_json(&opts.output).expect("read output");
    assert_eq!(
        out.categories,
        vec![Category::new(1u64, "dog"), Category::new(2u64, "cat")]
    );
    assert_eq!(out.annotations, vec![Annotation::new(10u64, 1u64)]);
    assert_eq!(out.images, vec![Image::new(10u64, "a/x.jpg")]);
}

#[test]
fn missing_category_is_offered_to_the_confirmer() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = write_doc(
        temp.path(),
        &CocoDocument {
            categories: vec![Category::new(1u64, "dog")],
            images: vec![Image::new(1u64, "a/x.jpg")],
            annotations: vec![Annotation::new(1u64, 1u64)],
            ..Default::default()
        },
    );
    let opts = options(temp.path(), &input, &["bicycle"]);

    let mut seen = Vec::new();
    let mut decline = |request: &ConfirmRequest<'_>| {
        if let ConfirmRequest::MissingCategories(names) = request {
            seen.extend(names.iter().cloned());
        }
        false
    };
    let err = run_filter(&opts, &mut decline).unwrap_err();

    assert!(matches!(err, CocoFilterError::MissingCategories { .. }));
    assert_eq!(seen, vec!["bicycle".to_string()]);
    assert!(!opts.output.exists());
}

#[test]
fn val_split_follows_side_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = write_doc(
        temp.path(),
        &CocoDocument {
            categories: vec![Category::new(5u64, "dog")],
            images: vec![Image::new(1u64, "d/a.jpg"), Image::new(2u64, "d/b.jpg")],
            annotations: vec![
                Annotation::new(1u64, 5u64).with_field("id", 1),
                Annotation::new(2u64, 5u64).with_field("id", 2),
            ],
            ..Default::default()
        },
    );
    let mut opts = options(temp.path(), &input, &["dog"]);
    opts.val_output = Some(temp.path().join("val.json"));
    fs::write(&opts.val_names, r#"["b.jpg"]"#).expect("write val names");

    run_filter(&opts, &mut ConfirmFlags::default()).expect("run");

    let train = read_coco_json(&opts.output).expect("read train");
    let val = read_coco_json(opts.val_output.as_deref().unwrap()).expect("read val");

    assert_eq!(train.images.len(), 1);
    assert_eq!(train.images[0].id.as_u64(), 1);
    assert!(train.annotations.iter().all(|a| a.image_id.as_u64() == 1));
    assert_eq!(val.images.len(), 1);
    assert_eq!(val.images[0].id.as_u64(), 2);
    assert!(val.annotations.iter().all(|a| a.image_id.as_u64() == 2));
    assert_eq!(train.categories, val.categories);
    assert_eq!(val.categories[0].id.as_u64(), 1);
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = copy_fixture(DUPLICATE_IDS, temp.path());
    let opts = options(temp.path(), &input, &["dog", "cat"]);

    // "cat" only exists as the skipped duplicate, so it counts as missing.
    let report = run_filter(&opts, &mut ConfirmFlags::permissive()).expect("run");

    assert_eq!(
        report.issues_with_code(IssueCode::DuplicateCategoryId).count(),
        1
    );
    assert_eq!(report.issues_with_code(IssueCode::DuplicateImageId).count(), 1);
    assert_eq!(report.issues_with_code(IssueCode::MissingCategory).count(), 1);

    let out = read_coco_json(&opts.output).expect("read output");
    assert_eq!(out.categories.len(), 1);
    assert_eq!(out.categories[0].name, "dog");
    assert_eq!(out.images[0].path(), Some("data/images/a.jpg"));
}

#[test]
fn filtered_output_refilters_to_itself() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = copy_fixture(common::SAMPLE, temp.path());
    let first = options(temp.path(), &input, &["cat", "person"]);
    run_filter(&first, &mut ConfirmFlags::default()).expect("first run");

    let mut second = options(temp.path(), &first.output, &["cat", "person"]);
    second.output = temp.path().join("again.json");
    run_filter(&second, &mut ConfirmFlags::default()).expect("second run");

    assert_eq!(
        read_coco_json(&first.output).expect("read first"),
        read_coco_json(&second.output).expect("read second")
    );
}
