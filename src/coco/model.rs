//! COCO document model.
//!
//! Only ids, names and references are typed. Everything else an entry
//! carries (`path`, `supercategory`, `bbox`, `segmentation`, ...) is kept
//! in an `extra` map so a filtered document keeps every field of the
//! records it retains, exactly as written.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{CategoryId, ImageId};

/// A complete COCO document as read from or written to disk.
///
/// Field order matches the order keys are written in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoDocument {
    /// Free-form info block. Passed through untouched.
    #[serde(default = "empty_list")]
    pub info: Value,

    /// Free-form license list. Passed through untouched.
    #[serde(default = "empty_list")]
    pub licenses: Value,

    pub images: Vec<Image>,

    pub annotations: Vec<Annotation>,

    pub categories: Vec<Category>,
}

impl Default for CocoDocument {
    fn default() -> Self {
        Self {
            info: empty_list(),
            licenses: empty_list(),
            images: Vec::new(),
            annotations: Vec::new(),
            categories: Vec::new(),
        }
    }
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// A category that annotations can belong to.
///
/// `supercategory` lives in `extra` so the key round-trips exactly as the
/// source wrote it, including `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Creates a category without a supercategory.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Creates a category with a supercategory.
    pub fn with_supercategory(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        supercategory: impl Into<String>,
    ) -> Self {
        Self::new(id, name).with_field("supercategory", supercategory.into())
    }

    /// Grouping label shared by related categories, if it is a string.
    pub fn supercategory(&self) -> Option<&str> {
        self.extra.get("supercategory").and_then(Value::as_str)
    }

    /// Adds an untyped field, e.g. `keypoints`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// An image entry.
///
/// `path` lives in `extra` for the same reason as
/// [`Category::supercategory`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    /// Creates an image with the given path.
    pub fn new(id: impl Into<ImageId>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
        .with_field("path", path.into())
    }

    /// Path of the image file, if it is a string. The last segment is its
    /// filename.
    pub fn path(&self) -> Option<&str> {
        self.extra.get("path").and_then(Value::as_str)
    }

    /// Adds an untyped field, e.g. `width` or `file_name`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// An annotation (segmentation) linking one image to one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub image_id: ImageId,

    pub category_id: CategoryId,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    /// Creates an annotation with no extra fields.
    pub fn new(image_id: impl Into<ImageId>, category_id: impl Into<CategoryId>) -> Self {
        Self {
            image_id: image_id.into(),
            category_id: category_id.into(),
            extra: Map::new(),
        }
    }

    /// Adds an untyped field, e.g. `id` or `bbox`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_info_and_licenses_default_to_empty_lists() {
        let doc: CocoDocument =
            serde_json::from_str(r#"{"images": [], "annotations": [], "categories": []}"#)
                .expect("parse");
        assert_eq!(doc.info, Value::Array(vec![]));
        assert_eq!(doc.licenses, Value::Array(vec![]));
    }

    #[test]
    fn unknown_fields_survive_in_extra() {
        let ann: Annotation = serde_json::from_str(
            r#"{"id": 5, "image_id": 1, "category_id": 2, "bbox": [1, 2, 3, 4], "iscrowd": 0}"#,
        )
        .expect("parse");
        assert_eq!(ann.image_id, ImageId(1));
        assert_eq!(ann.category_id, CategoryId(2));
        assert_eq!(ann.extra["id"], 5);
        assert_eq!(ann.extra["bbox"], serde_json::json!([1, 2, 3, 4]));

        let json = serde_json::to_value(&ann).expect("serialize");
        assert_eq!(json["iscrowd"], 0);
        assert_eq!(json["category_id"], 2);
    }

    #[test]
    fn supercategory_is_optional() {
        let cat: Category = serde_json::from_str(r#"{"id": 1, "name": "dog"}"#).expect("parse");
        assert_eq!(cat.supercategory(), None);
        let json = serde_json::to_string(&cat).expect("serialize");
        assert!(!json.contains("supercategory"));
    }

    #[test]
    fn null_fields_are_written_back_as_null() {
        let cat: Category =
            serde_json::from_str(r#"{"id": 1, "name": "dog", "supercategory": null}"#)
                .expect("parse category");
        assert_eq!(cat.supercategory(), None);
        let json = serde_json::to_value(&cat).expect("serialize category");
        assert_eq!(json.get("supercategory"), Some(&Value::Null));

        let image: Image =
            serde_json::from_str(r#"{"id": 1, "path": null, "file_name": "a.jpg"}"#)
                .expect("parse image");
        assert_eq!(image.path(), None);
        let json = serde_json::to_value(&image).expect("serialize image");
        assert_eq!(json.get("path"), Some(&Value::Null));
        assert_eq!(json["file_name"], "a.jpg");
    }
}
