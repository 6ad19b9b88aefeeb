//! Integration tests for the CLI materialization paths, driven against
//! temporary directories.

use std::fs;

use mend::command::apply::apply_to_dir;
use mend::command::partial_edit::apply_edit;
use mend::command::CommandError;
use mend::patch::DiffError;
use tempfile::tempdir;

/// Helper to construct a patch with the given body.
fn wrap_patch(body: &str) -> String {
    format!("*** Begin Patch\n{body}\n*** End Patch")
}

#[test]
fn test_apply_to_dir_materializes_every_action_kind() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("upd.txt"), "one\ntwo\n").unwrap();
    fs::write(dir.path().join("gone.txt"), "bye\n").unwrap();
    fs::write(dir.path().join("mv.txt"), "m\n").unwrap();

    let patch = wrap_patch(
        "*** Add File: sub/fresh.txt\n\
         +hello\n\
         *** Delete File: gone.txt\n\
         *** Update File: upd.txt\n\
         -one\n\
         +ONE\n\
         *** Update File: mv.txt\n\
         *** Move to: moved.txt\n m",
    );
    apply_to_dir(&patch, dir.path()).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("sub/fresh.txt")).unwrap(),
        "hello"
    );
    assert!(!dir.path().join("gone.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("upd.txt")).unwrap(),
        "ONE\ntwo\n"
    );
    assert!(!dir.path().join("mv.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("moved.txt")).unwrap(),
        "m\n"
    );
}

#[test]
fn test_apply_to_dir_rejects_updates_of_absent_files() {
    let dir = tempdir().unwrap();
    let patch = wrap_patch("*** Update File: nope.txt\n@@\n-x\n+y");
    let err = apply_to_dir(&patch, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Diff(DiffError::MissingFile(path)) if path == "nope.txt"
    ));
}

#[test]
fn test_apply_to_dir_rejects_adding_over_an_existing_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("taken.txt"), "already here\n").unwrap();
    let patch = wrap_patch("*** Add File: taken.txt\n+clobber");
    let err = apply_to_dir(&patch, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Diff(DiffError::FileExists(path)) if path == "taken.txt"
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("taken.txt")).unwrap(),
        "already here\n"
    );
}

#[test]
fn test_apply_to_dir_leaves_the_tree_alone_on_parse_errors() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a\n").unwrap();
    // Delete of a.txt parses first, but the unknown header must abort the
    // whole patch before anything is written.
    let patch = wrap_patch("*** Delete File: a.txt\n*** Truncate File: a.txt");
    assert!(apply_to_dir(&patch, dir.path()).is_err());
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_apply_subcommand_runs_from_a_patch_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("f.txt"), "a\nb\n").unwrap();
    let patch_path = dir.path().join("edit.patch");
    fs::write(&patch_path, wrap_patch("*** Update File: f.txt\n a\n-b\n+B")).unwrap();

    let dir_arg = dir.path().to_str().unwrap();
    let patch_arg = patch_path.to_str().unwrap();
    mend::cli::parse(Some(&["mend", "apply", patch_arg, "--dir", dir_arg])).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("f.txt")).unwrap(),
        "a\nB\n"
    );
}

#[test]
fn test_partial_edit_apply_writes_the_side_files() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "alpha\nbeta\n").unwrap();

    let patch = wrap_patch(&format!(
        "*** Update File: {}\n alpha\n-beta\n+gamma",
        file.display()
    ));
    let fuzz = apply_edit(&file, "alpha\nbeta\n", &patch).unwrap();
    assert_eq!(fuzz, 0);

    assert_eq!(fs::read_to_string(&file).unwrap(), "alpha\ngamma\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt.old")).unwrap(),
        "alpha\nbeta\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt.patch")).unwrap(),
        patch
    );
}

#[test]
fn test_partial_edit_apply_keeps_the_file_when_the_patch_is_bad() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "alpha\n").unwrap();

    let patch = wrap_patch(&format!(
        "*** Update File: {}\n-no such line\n+replacement",
        file.display()
    ));
    assert!(apply_edit(&file, "alpha\n", &patch).is_err());

    // No rename, no side files, content untouched.
    assert_eq!(fs::read_to_string(&file).unwrap(), "alpha\n");
    assert!(!dir.path().join("notes.txt.old").exists());
    assert!(!dir.path().join("notes.txt.patch").exists());
}
