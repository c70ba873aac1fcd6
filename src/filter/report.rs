//! Filter report types.
//!
//! Every non-fatal condition met while indexing, filtering or writing is
//! recorded here so the caller sees it even when the run goes ahead.

use serde::Serialize;
use std::fmt;

use crate::coco::CocoDocument;

/// A report generated by one filter run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FilterReport {
    /// Counts from the source document.
    pub input: FilterCounts,
    /// Counts in the main output document.
    pub output: FilterCounts,
    /// Counts of the validation partition, if a split was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<FilterCounts>,
    /// Issues discovered during the run.
    pub issues: Vec<FilterIssue>,
}

impl FilterReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report and logs it as a warning.
    pub fn add(&mut self, issue: FilterIssue) {
        log::warn!("{}", issue.message);
        self.issues.push(issue);
    }

    /// Number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.issues.len()
    }

    /// Issues with the given code.
    pub fn issues_with_code(&self, code: IssueCode) -> impl Iterator<Item = &FilterIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }

    /// Returns true if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  input:  {}", self.input)?;
        match self.val {
            Some(val) => {
                writeln!(f, "  train:  {}", self.output)?;
                writeln!(f, "  val:    {}", val)?;
            }
            None => writeln!(f, "  output: {}", self.output)?,
        }

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", self.warning_count())?;
            for issue in &self.issues {
                writeln!(f, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Entity counts of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
}

impl FilterCounts {
    /// Counts the entities of a document.
    pub fn of(doc: &CocoDocument) -> Self {
        Self {
            images: doc.images.len(),
            categories: doc.categories.len(),
            annotations: doc.annotations.len(),
        }
    }
}

impl fmt::Display for FilterCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images, {} categories, {} annotations",
            self.images, self.categories, self.annotations
        )
    }
}

/// A single non-fatal condition, always surfaced as a warning.
#[derive(Clone, Debug, Serialize)]
pub struct FilterIssue {
    /// A stable code for the issue type.
    pub code: IssueCode,
    pub message: String,
}

impl FilterIssue {
    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FilterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

/// Stable codes for report issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A second category with an already-seen id was skipped.
    DuplicateCategoryId,
    /// A second image with an already-seen id was skipped.
    DuplicateImageId,
    /// A requested category name does not exist in the source.
    MissingCategory,
    /// An annotation references an image id that is not in the document.
    DanglingImageRef,
    /// An existing output file was overwritten.
    OutputOverwritten,
}
