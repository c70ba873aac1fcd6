//! COCO document types and JSON I/O.
//!
//! # Example
//!
//! ```
//! use cocofilter::coco::{Annotation, Category, CocoDocument, Image};
//!
//! let doc = CocoDocument {
//!     images: vec![Image::new(10u64, "a/x.jpg")],
//!     categories: vec![Category::new(1u64, "dog")],
//!     annotations: vec![Annotation::new(10u64, 1u64)],
//!     ..Default::default()
//! };
//! assert_eq!(doc.images.len(), 1);
//! ```

mod ids;
mod io;
mod model;

pub use ids::{CategoryId, ImageId};
pub use io::{
    from_coco_slice, from_coco_str, read_coco_json, to_coco_string, to_coco_vec, write_coco_json,
};
pub use model::{Annotation, Category, CocoDocument, Image};
