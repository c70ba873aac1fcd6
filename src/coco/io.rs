//! COCO JSON reader and writer.
//!
//! The reader accepts any document with `images`, `annotations` and
//! `categories` arrays; `info` and `licenses` are optional. Records are kept
//! in source order. The writer never reorders anything: ordering decisions
//! belong to the filter.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use super::model::CocoDocument;
use crate::error::CocoFilterError;

/// Reads a COCO document from a JSON file.
///
/// # Errors
/// Returns [`CocoFilterError::NotFound`] if `path` does not exist and
/// [`CocoFilterError::Parse`] if the file is not a well-formed document.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use cocofilter::coco::read_coco_json;
///
/// let doc = read_coco_json(Path::new("instances.json"))?;
/// # Ok::<(), cocofilter::CocoFilterError>(())
/// ```
pub fn read_coco_json(path: &Path) -> Result<CocoDocument, CocoFilterError> {
    if !path.exists() {
        return Err(CocoFilterError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(CocoFilterError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| CocoFilterError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a COCO document to a JSON file, replacing any existing file.
///
/// Overwrite confirmation is the caller's job; see
/// [`crate::pipeline::write_outputs`].
pub fn write_coco_json(
    path: &Path,
    doc: &CocoDocument,
    pretty: bool,
) -> Result<(), CocoFilterError> {
    let bytes = to_coco_vec(doc, pretty).map_err(|source| CocoFilterError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(CocoFilterError::Io)
}

/// Reads a COCO document from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_coco_str(json: &str) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a COCO document from a JSON byte slice.
///
/// Used by the fuzz target.
pub fn from_coco_slice(bytes: &[u8]) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes a COCO document to a JSON string.
pub fn to_coco_string(doc: &CocoDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Serializes a COCO document to bytes, compact unless `pretty` is set.
pub fn to_coco_vec(doc: &CocoDocument, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
    if pretty {
        serde_json::to_vec_pretty(doc)
    } else {
        serde_json::to_vec(doc)
    }
}
