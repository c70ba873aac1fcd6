#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const SAMPLE: &str = "tests/fixtures/sample.coco.json";
pub const DUPLICATE_IDS: &str = "tests/fixtures/duplicate_ids.coco.json";

/// Copies a fixture into `dir` and returns the new path.
pub fn copy_fixture(fixture: &str, dir: &Path) -> PathBuf {
    let name = Path::new(fixture).file_name().expect("fixture file name");
    let dest = dir.join(name);
    fs::copy(fixture, &dest).expect("copy fixture");
    dest
}

/// Reads a JSON file as an untyped value.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("read json output");
    serde_json::from_str(&text).expect("parse json output")
}
