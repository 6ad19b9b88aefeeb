//! The patch engine: applies pseudo-diff patches to in-memory text files.
//!
//! Patches are framed by `*** Begin Patch` / `*** End Patch` and carry
//! per-file add, delete, and update actions whose hunks are anchored by
//! quoted context rather than line numbers. The format is aimed at patches
//! written by language models: quoted context tends to be accurate where
//! line numbers are not, so matching tolerates trailing-whitespace and
//! indentation drift and reports how much tolerance was needed as a "fuzz"
//! score.
//!
//! The engine is pure. It takes the patch text and a map of file contents
//! and returns the map of affected files; all I/O belongs to callers.
//! Stages are composed by [`process_patch`]:
//!
//! - [`text_to_patch`] — parse and anchor every hunk (`parser`)
//! - [`patch_to_commit`] — resolve per-path before/after content (`commit`)
//! - [`apply_commit`] — produce the output file map (`commit`)
//!
//! [`files_needed`] and [`files_added`] are cheap pre-parse scans for
//! callers that must gather file contents before invoking the engine.

mod commit;
mod error;
mod parser;
mod seek_sequence;

pub use commit::{Commit, FileChange, apply_commit, patch_to_commit};
pub use error::{DiffError, DiffResult};
pub use parser::{Chunk, Patch, PatchAction, text_to_patch};

use std::collections::HashMap;

use parser::{
    ADD_FILE_MARKER, BEGIN_PATCH_MARKER, DELETE_FILE_MARKER, UPDATE_FILE_MARKER, norm,
};

/// Apply `patch_text` to `files` and return the affected paths with their
/// new content.
///
/// Paths the patch does not mention are absent from the result; carrying
/// them forward is the caller's concern. Any failure leaves no partial
/// output.
pub fn process_patch(
    patch_text: &str,
    files: &HashMap<String, String>,
) -> DiffResult<HashMap<String, String>> {
    if !patch_text.starts_with(BEGIN_PATCH_MARKER) {
        return Err(DiffError::Framing(format!(
            "patch must start with '{BEGIN_PATCH_MARKER}'"
        )));
    }
    let (patch, _fuzz) = text_to_patch(patch_text, files)?;
    let commit = patch_to_commit(&patch, files)?;
    apply_commit(&commit)
}

/// The paths an update or delete action will read, in document order.
///
/// A raw line scan that never fails, so planners can run it on patch text
/// that has not been validated yet.
pub fn files_needed(patch_text: &str) -> Vec<String> {
    scan_paths(patch_text, &[UPDATE_FILE_MARKER, DELETE_FILE_MARKER])
}

/// The paths an add action will create, in document order. Never fails.
pub fn files_added(patch_text: &str) -> Vec<String> {
    scan_paths(patch_text, &[ADD_FILE_MARKER])
}

fn scan_paths(patch_text: &str, markers: &[&str]) -> Vec<String> {
    patch_text
        .split('\n')
        .filter_map(|line| {
            let line = norm(line);
            markers.iter().find_map(|m| line.strip_prefix(m))
        })
        .map(str::to_string)
        .collect()
}
