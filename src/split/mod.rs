//! Train/validation partitioning by image filename.
//!
//! Validation membership comes from a side file holding a JSON array of
//! image filenames. An image belongs to the validation partition when the
//! last segment of its path is in that list; everything else is training.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use crate::coco::{CocoDocument, Image, ImageId};
use crate::error::CocoFilterError;

/// Default side file holding validation image filenames.
pub const DEFAULT_VAL_NAMES_FILE: &str = "val_names.json";

/// Default number of names drawn by [`sample_val_names`].
pub const DEFAULT_VAL_COUNT: usize = 30;

/// The two halves of a split document.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainValSplit {
    pub train: CocoDocument,
    pub val: CocoDocument,
}

/// Reads the validation filename list.
///
/// # Errors
/// Any failure (missing file, unreadable file, not a JSON string array) is
/// reported as [`CocoFilterError::MissingSplitFile`].
pub fn read_val_names(path: &Path) -> Result<HashSet<String>, CocoFilterError> {
    let missing = |reason: String| CocoFilterError::MissingSplitFile {
        path: path.to_path_buf(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|e| missing(e.to_string()))?;
    let names: Vec<String> =
        serde_json::from_str(&contents).map_err(|e| missing(e.to_string()))?;
    Ok(names.into_iter().collect())
}

/// Writes a validation filename list as a JSON array.
pub fn write_val_names(path: &Path, names: &[String]) -> Result<(), CocoFilterError> {
    let bytes = serde_json::to_vec(names).map_err(|source| CocoFilterError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(CocoFilterError::Io)
}

/// Filename of an image: the last segment of `path`, or of `file_name`
/// when the image has no `path`.
pub fn image_file_name(image: &Image) -> Option<&str> {
    let full = image
        .path()
        .or_else(|| image.extra.get("file_name").and_then(|v| v.as_str()))?;
    full.rsplit(['/', '\\']).next()
}

/// Partitions a filtered document into train and validation documents.
///
/// Both halves share `info`, `licenses` and the category list. Images
/// without a filename go to training.
pub fn split_by_val_names(doc: &CocoDocument, val_names: &HashSet<String>) -> TrainValSplit {
    let (val_images, train_images): (Vec<Image>, Vec<Image>) =
        doc.images.iter().cloned().partition(|image| {
            image_file_name(image).is_some_and(|name| val_names.contains(name))
        });

    let val_ids: HashSet<ImageId> = val_images.iter().map(|i| i.id).collect();
    let train_ids: HashSet<ImageId> = train_images.iter().map(|i| i.id).collect();

    let partition = |images: Vec<Image>, ids: &HashSet<ImageId>| CocoDocument {
        info: doc.info.clone(),
        licenses: doc.licenses.clone(),
        images,
        annotations: doc
            .annotations
            .iter()
            .filter(|ann| ids.contains(&ann.image_id))
            .cloned()
            .collect(),
        categories: doc.categories.clone(),
    };

    TrainValSplit {
        train: partition(train_images, &train_ids),
        val: partition(val_images, &val_ids),
    }
}

/// Draws up to `count` distinct image filenames for a validation list.
///
/// The result is sorted. With a seed the draw is reproducible.
pub fn sample_val_names(doc: &CocoDocument, count: usize, seed: Option<u64>) -> Vec<String> {
    let mut names: Vec<String> = doc
        .images
        .iter()
        .filter_map(image_file_name)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if count >= names.len() {
        return names;
    }

    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        names.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        names.shuffle(&mut rng);
    }

    names.truncate(count);
    names.sort();
    names
}
