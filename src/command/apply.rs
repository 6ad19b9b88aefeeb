//! Implementation of `mend apply`: applies an already-written patch from a
//! file or stdin to the working tree, no model involved.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use super::{CommandError, materialize_commit};
use crate::patch::{Commit, FileChange, files_added, files_needed, patch_to_commit, text_to_patch};

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Patch file to read; stdin when omitted
    pub patch: Option<PathBuf>,

    /// Directory the patch's paths are resolved against
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

pub async fn execute(args: ApplyArgs) -> Result<(), CommandError> {
    let patch_text = match &args.patch {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CommandError::io(format!("failed to read patch {}", path.display()), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CommandError::io("failed to read patch from stdin", e))?;
            buf
        }
    };

    let commit = apply_to_dir(&patch_text, &args.dir)?;
    print!("{}", summary(&commit));
    Ok(())
}

/// Load the files the patch touches, apply it in memory, and materialize
/// the result under `root`.
pub fn apply_to_dir(patch_text: &str, root: &Path) -> Result<Commit, CommandError> {
    let mut files: HashMap<String, String> = HashMap::new();
    for path in files_needed(patch_text) {
        // A path that is not readable here simply stays out of the map and
        // surfaces as a missing-file parse error with the patch's own name
        // for it.
        load_into(&mut files, root, path)?;
    }
    for path in files_added(patch_text) {
        // Pre-loading an existing add target lets the parser reject the
        // collision instead of silently overwriting on disk.
        load_into(&mut files, root, path)?;
    }

    let (patch, fuzz) = text_to_patch(patch_text, &files)?;
    if fuzz > 0 {
        eprintln!(
            "{}",
            format!("warning: patch applied with fuzz {fuzz}").yellow()
        );
    }
    let commit = patch_to_commit(&patch, &files)?;
    materialize_commit(&commit, root)?;
    Ok(commit)
}

fn load_into(
    files: &mut HashMap<String, String>,
    root: &Path,
    path: String,
) -> Result<(), CommandError> {
    let full = root.join(&path);
    if full.is_file() {
        let content = fs::read_to_string(&full)
            .map_err(|e| CommandError::io(format!("failed to read {}", full.display()), e))?;
        files.insert(path, content);
    }
    Ok(())
}

/// Git-style one-line-per-path summary of an applied commit.
fn summary(commit: &Commit) -> String {
    let mut out = String::new();
    for (path, change) in &commit.changes {
        let line = match change {
            FileChange::Add { .. } => format!("{} {path}", "A".green()),
            FileChange::Delete { .. } => format!("{} {path}", "D".red()),
            FileChange::Update {
                move_path: Some(dest),
                ..
            } => format!("{} {path} -> {dest}", "M".yellow()),
            FileChange::Update { .. } => format!("{} {path}", "M".yellow()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
