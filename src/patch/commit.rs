//! Commit derivation and application.
//!
//! A [`Commit`] is the resolved view of a parsed [`Patch`]: concrete before
//! and after content per path, ready to materialize. Deriving it is where
//! chunk offsets are finally checked against the file they edit.

use std::collections::HashMap;

use super::error::{DiffError, DiffResult};
use super::parser::{Chunk, Patch, PatchAction};

/// The resolved change for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Add {
        new_content: String,
    },
    Delete {
        /// Content at deletion time, kept for auditing callers.
        old_content: String,
    },
    Update {
        old_content: String,
        new_content: String,
        move_path: Option<String>,
    },
}

/// An ordered mapping from path to [`FileChange`], in patch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub changes: Vec<(String, FileChange)>,
}

/// Resolve a parsed patch into concrete per-path content.
pub fn patch_to_commit(patch: &Patch, files: &HashMap<String, String>) -> DiffResult<Commit> {
    let mut commit = Commit::default();
    for (path, action) in &patch.actions {
        let change = match action {
            PatchAction::Add { new_file } => FileChange::Add {
                new_content: new_file.clone(),
            },
            PatchAction::Delete => {
                let old = lookup(files, path)?;
                FileChange::Delete {
                    old_content: old.clone(),
                }
            }
            PatchAction::Update { chunks, move_path } => {
                let old = lookup(files, path)?;
                FileChange::Update {
                    old_content: old.clone(),
                    new_content: updated_content(old, chunks, path)?,
                    move_path: move_path.clone(),
                }
            }
        };
        commit.changes.push((path.clone(), change));
    }
    Ok(commit)
}

fn lookup<'a>(files: &'a HashMap<String, String>, path: &str) -> DiffResult<&'a String> {
    files
        .get(path)
        .ok_or_else(|| DiffError::MissingFile(path.to_string()))
}

/// Replay an update's chunks over the original content.
///
/// Splitting on `\n` and rejoining is an identity on the untouched regions,
/// so the original's trailing-newline state survives unchanged.
fn updated_content(orig: &str, chunks: &[Chunk], path: &str) -> DiffResult<String> {
    let orig_lines: Vec<&str> = orig.split('\n').collect();
    let mut dest_lines: Vec<&str> = Vec::new();
    let mut cursor = 0usize;

    for chunk in chunks {
        if chunk.orig_index > orig_lines.len() {
            return Err(DiffError::RangeExceeded {
                path: path.to_string(),
                index: chunk.orig_index,
                len: orig_lines.len(),
            });
        }
        if cursor > chunk.orig_index {
            return Err(DiffError::OverlappingChunks {
                path: path.to_string(),
                index: chunk.orig_index,
            });
        }
        dest_lines.extend(&orig_lines[cursor..chunk.orig_index]);
        dest_lines.extend(chunk.ins_lines.iter().map(String::as_str));
        cursor = chunk.orig_index + chunk.del_lines.len();
    }
    if let Some(tail) = orig_lines.get(cursor..) {
        dest_lines.extend(tail);
    }

    Ok(dest_lines.join("\n"))
}

/// Materialize a commit as the output file collection.
///
/// Only affected paths appear: deletes are omitted, and a moved update
/// appears under its destination only. Two changes claiming the same output
/// path is an error.
pub fn apply_commit(commit: &Commit) -> DiffResult<HashMap<String, String>> {
    let mut files_out: HashMap<String, String> = HashMap::new();
    for (path, change) in &commit.changes {
        match change {
            FileChange::Delete { .. } => {}
            FileChange::Add { new_content } => insert_fresh(&mut files_out, path, new_content)?,
            FileChange::Update {
                new_content,
                move_path,
                ..
            } => {
                let dest = move_path.as_deref().unwrap_or(path);
                insert_fresh(&mut files_out, dest, new_content)?;
            }
        }
    }
    Ok(files_out)
}

fn insert_fresh(
    files: &mut HashMap<String, String>,
    path: &str,
    content: &str,
) -> DiffResult<()> {
    if files
        .insert(path.to_string(), content.to_string())
        .is_some()
    {
        return Err(DiffError::FileExists(path.to_string()));
    }
    Ok(())
}
