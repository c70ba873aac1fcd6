//! Confirmation policy for decisions that need the caller's consent.
//!
//! The filter never reads from a terminal. When it reaches a point that
//! needs a yes/no answer it builds a [`ConfirmRequest`] and asks the
//! [`Confirm`] implementation it was given. Declining turns into a
//! controlled abort before anything is written.

use std::path::Path;

/// A decision point that needs the caller's consent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmRequest<'a> {
    /// Some requested category names do not exist in the source document.
    MissingCategories(&'a [String]),
    /// The destination file already exists.
    OverwriteOutput(&'a Path),
}

/// Answers confirmation requests.
pub trait Confirm {
    /// Returns true to proceed, false to abort.
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmRequest<'_>) -> bool,
{
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        self(request)
    }
}

/// Static answers, as set by command-line flags.
///
/// The default answers no to everything (strict mode).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfirmFlags {
    /// Proceed with the matching subset when categories are missing.
    pub allow_missing: bool,
    /// Replace existing output files.
    pub overwrite: bool,
}

impl ConfirmFlags {
    /// Answers yes to everything.
    pub fn permissive() -> Self {
        Self {
            allow_missing: true,
            overwrite: true,
        }
    }
}

impl Confirm for ConfirmFlags {
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        match request {
            ConfirmRequest::MissingCategories(_) => self.allow_missing,
            ConfirmRequest::OverwriteOutput(_) => self.overwrite,
        }
    }
}
