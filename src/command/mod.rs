//! Command implementations for the CLI, one module per subcommand.

pub mod apply;
pub mod partial_edit;

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::llm::CompletionError;
use crate::patch::{Commit, DiffError, FileChange};

/// Failure of a CLI command; `main` prints it and exits non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl CommandError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        CommandError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Write a resolved commit into the working tree under `root`.
///
/// Adds and updates write their content (creating parent directories),
/// moves write the destination and drop the source, deletes remove the
/// path. Removing an already-absent file is fine; the commit is the source
/// of truth for what should no longer exist.
pub(crate) fn materialize_commit(commit: &Commit, root: &Path) -> Result<(), CommandError> {
    for (path, change) in &commit.changes {
        match change {
            FileChange::Add { new_content } => write_file(&root.join(path), new_content)?,
            FileChange::Delete { .. } => remove_file(&root.join(path))?,
            FileChange::Update {
                new_content,
                move_path,
                ..
            } => match move_path {
                Some(dest) => {
                    write_file(&root.join(dest), new_content)?;
                    remove_file(&root.join(path))?;
                }
                None => write_file(&root.join(path), new_content)?,
            },
        }
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), CommandError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::io(
                format!("failed to create parent directories for {}", path.display()),
                e,
            )
        })?;
    }
    fs::write(path, content)
        .map_err(|e| CommandError::io(format!("failed to write {}", path.display()), e))
}

fn remove_file(path: &Path) -> Result<(), CommandError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CommandError::io(
            format!("failed to remove {}", path.display()),
            e,
        )),
    }
}
