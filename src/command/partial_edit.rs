//! Implementation of `mend partial-edit`: asks the model for a patch that
//! performs a described edit to one file, then applies it with side files
//! for the previous content and the patch itself.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use super::{CommandError, materialize_commit};
use crate::llm::CompletionError;
use crate::llm::openai::{Client, GPT_4O_MINI};
use crate::llm::prompt::{PATCH_SYSTEM_PROMPT, extract_patch, render_task_prompt};
use crate::patch::{patch_to_commit, text_to_patch};

#[derive(Parser, Debug)]
pub struct PartialEditArgs {
    /// File to edit
    pub file: PathBuf,

    /// What to change, in natural language
    pub task: String,

    /// Model id (provider-specific)
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn execute(args: PartialEditArgs) -> Result<(), CommandError> {
    if args.task.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "task must not be empty".to_string(),
        ));
    }
    let content = fs::read_to_string(&args.file).map_err(|e| {
        CommandError::io(format!("failed to read {}", args.file.display()), e)
    })?;

    let client = Client::from_env().map_err(|_| {
        CommandError::InvalidArguments("OPENAI_API_KEY is not set".to_string())
    })?;
    let model = client.completion_model(args.model.as_deref().unwrap_or(GPT_4O_MINI));
    let path_key = args.file.to_string_lossy();
    let reply = model
        .complete(
            PATCH_SYSTEM_PROMPT,
            &render_task_prompt(&path_key, &content, &args.task),
        )
        .await?;
    let patch_text = extract_patch(&reply).ok_or_else(|| {
        CompletionError::ResponseError("model reply did not contain a framed patch".to_string())
    })?;

    let fuzz = apply_edit(&args.file, &content, &patch_text)?;
    if fuzz > 0 {
        eprintln!(
            "{}",
            format!("warning: patch applied with fuzz {fuzz}").yellow()
        );
    }
    println!("{} {}", "Updated".green(), args.file.display());
    Ok(())
}

/// Apply `patch_text` to `file` (whose current content is `content`),
/// keeping the pre-edit content in `<file>.old` and the patch itself in
/// `<file>.patch`. Returns the fuzz the application needed.
///
/// The patch is resolved in memory first; a patch that does not apply
/// leaves the working tree untouched.
pub fn apply_edit(file: &Path, content: &str, patch_text: &str) -> Result<u64, CommandError> {
    let path_key = file.to_string_lossy().to_string();
    let files = HashMap::from([(path_key, content.to_string())]);
    let (patch, fuzz) = text_to_patch(patch_text, &files)?;
    let commit = patch_to_commit(&patch, &files)?;

    let old_path = side_file(file, "old");
    fs::rename(file, &old_path).map_err(|e| {
        CommandError::io(
            format!(
                "failed to rename {} to {}",
                file.display(),
                old_path.display()
            ),
            e,
        )
    })?;
    let patch_path = side_file(file, "patch");
    fs::write(&patch_path, patch_text).map_err(|e| {
        CommandError::io(format!("failed to write {}", patch_path.display()), e)
    })?;

    materialize_commit(&commit, Path::new("."))?;
    Ok(fuzz)
}

/// `<file>.<suffix>` next to the original.
fn side_file(file: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = file.as_os_str().to_os_string();
    os.push(".");
    os.push(suffix);
    PathBuf::from(os)
}
