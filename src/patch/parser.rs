//! Parsing of the pseudo-diff patch format into a [`Patch`].
//!
//! The grammar for the format is:
//!
//! Patch      := "*** Begin Patch" LF Action* "*** End Patch"
//! Action     := Update | Delete | Add
//! Update     := "*** Update File: " path LF ("*** Move to: " path LF)? Hunk+
//! Delete     := "*** Delete File: " path LF
//! Add        := "*** Add File: " path LF ("+" line LF)+
//! Hunk       := ("@@ " anchor LF | "@@" LF)? SectionLine+ ("*** End of File" LF)?
//! SectionLine:= (" " | "+" | "-") text LF
//!
//! Hunks carry no line numbers; each one is anchored by its context lines
//! (and optionally an `@@ anchor` line), which the parser resolves against
//! the target file's current content while it walks the patch. Paths are
//! taken verbatim after the marker prefixes. A trailing carriage return on
//! any patch line is ignored, so CRLF-authored patches apply identically.

use std::collections::HashMap;

use super::error::{DiffError, DiffResult};
use super::seek_sequence::find_context;

pub(crate) const BEGIN_PATCH_MARKER: &str = "*** Begin Patch";
pub(crate) const END_PATCH_MARKER: &str = "*** End Patch";
pub(crate) const ADD_FILE_MARKER: &str = "*** Add File: ";
pub(crate) const DELETE_FILE_MARKER: &str = "*** Delete File: ";
pub(crate) const UPDATE_FILE_MARKER: &str = "*** Update File: ";
pub(crate) const MOVE_TO_MARKER: &str = "*** Move to: ";
pub(crate) const EOF_MARKER: &str = "*** End of File";
pub(crate) const CHANGE_CONTEXT_MARKER: &str = "@@ ";
pub(crate) const EMPTY_CHANGE_CONTEXT_MARKER: &str = "@@";

/// A lone `***` ends a hunk; models sometimes emit it when a reply is cut
/// short, and treating it as a terminator keeps the error local.
const HUNK_BREAK_MARKER: &str = "***";

/// One contiguous edit inside an update, resolved to a file offset.
///
/// `orig_index` is the 0-based line offset at which `del_lines` are removed
/// and `ins_lines` inserted. An index equal to the file's line count is an
/// append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub orig_index: usize,
    pub del_lines: Vec<String>,
    pub ins_lines: Vec<String>,
}

/// A single file-level operation within a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchAction {
    Add {
        /// Full content of the new file, lines joined with `\n`.
        new_file: String,
    },
    Delete,
    Update {
        /// Chunks in file order; offsets are strictly non-overlapping.
        chunks: Vec<Chunk>,
        move_path: Option<String>,
    },
}

/// An ordered collection of per-file actions, one per path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub actions: Vec<(String, PatchAction)>,
}

impl Patch {
    fn contains(&self, path: &str) -> bool {
        self.actions.iter().any(|(p, _)| p == path)
    }
}

/// Strip one trailing carriage return, for CRLF-authored patch lines.
pub(crate) fn norm(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Parse `text` into a [`Patch`] against `files`, returning the accumulated
/// fuzz alongside it.
///
/// Fuzz is informational: zero means every anchor and context line matched
/// exactly; anything else means whitespace tolerance (or the end-of-file
/// fallback) was needed somewhere. Callers that care should warn on
/// non-zero fuzz even though the patch applied.
pub fn text_to_patch(
    text: &str,
    files: &HashMap<String, String>,
) -> DiffResult<(Patch, u64)> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    // A trailing newline on the patch text leaves one empty artifact line
    // behind the closing marker; drop it. Interior empty lines survive.
    if lines.last().is_some_and(|l| norm(l).is_empty()) {
        lines.pop();
    }

    let well_framed = lines.len() >= 2
        && lines
            .first()
            .is_some_and(|l| norm(l).starts_with(BEGIN_PATCH_MARKER))
        && lines.last().is_some_and(|l| norm(l) == END_PATCH_MARKER);
    if !well_framed {
        return Err(DiffError::Framing(format!(
            "patch must start with '{BEGIN_PATCH_MARKER}' and end with '{END_PATCH_MARKER}'"
        )));
    }

    let mut parser = Parser::new(files, lines);
    parser.parse()?;
    Ok((parser.patch, parser.fuzz))
}

/// Cursor-driven recognizer over the patch's line sequence.
struct Parser<'a> {
    files: &'a HashMap<String, String>,
    lines: Vec<&'a str>,
    index: usize,
    patch: Patch,
    fuzz: u64,
}

impl<'a> Parser<'a> {
    fn new(files: &'a HashMap<String, String>, lines: Vec<&'a str>) -> Self {
        Self {
            files,
            lines,
            // Position 0 is the begin marker.
            index: 1,
            patch: Patch::default(),
            fuzz: 0,
        }
    }

    fn cur_line(&self) -> &'a str {
        self.lines.get(self.index).map(|l| norm(l)).unwrap_or("")
    }

    fn is_done(&self, prefixes: &[&str]) -> bool {
        self.index >= self.lines.len()
            || prefixes.iter().any(|p| self.cur_line().starts_with(p))
    }

    /// Consume the current line if it starts with `prefix`, returning the
    /// remainder verbatim.
    fn read_prefix(&mut self, prefix: &str) -> Option<&'a str> {
        let rest = self.cur_line().strip_prefix(prefix)?;
        self.index += 1;
        Some(rest)
    }

    fn read_line(&mut self) -> &'a str {
        let line = self.cur_line();
        self.index += 1;
        line
    }

    fn parse(&mut self) -> DiffResult<()> {
        while !self.is_done(&[END_PATCH_MARKER]) {
            if let Some(path) = self.read_prefix(UPDATE_FILE_MARKER) {
                let path = path.to_string();
                self.ensure_fresh(&path)?;
                let move_path = self.read_prefix(MOVE_TO_MARKER).map(str::to_string);
                let Some(text) = self.files.get(&path) else {
                    return Err(DiffError::MissingFile(path));
                };
                let chunks = self.parse_update_hunks(text)?;
                self.patch
                    .actions
                    .push((path, PatchAction::Update { chunks, move_path }));
                continue;
            }
            if let Some(path) = self.read_prefix(DELETE_FILE_MARKER) {
                let path = path.to_string();
                self.ensure_fresh(&path)?;
                if !self.files.contains_key(&path) {
                    return Err(DiffError::MissingFile(path));
                }
                self.patch.actions.push((path, PatchAction::Delete));
                continue;
            }
            if let Some(path) = self.read_prefix(ADD_FILE_MARKER) {
                let path = path.to_string();
                self.ensure_fresh(&path)?;
                if self.files.contains_key(&path) {
                    return Err(DiffError::FileExists(path));
                }
                let new_file = self.parse_add_lines()?;
                self.patch
                    .actions
                    .push((path, PatchAction::Add { new_file }));
                continue;
            }
            return Err(DiffError::UnknownLine(self.cur_line().to_string()));
        }
        if !self.cur_line().starts_with(END_PATCH_MARKER) {
            return Err(DiffError::UnexpectedEof);
        }
        self.index += 1;
        Ok(())
    }

    fn ensure_fresh(&self, path: &str) -> DiffResult<()> {
        if self.patch.contains(path) {
            return Err(DiffError::DuplicateAction(path.to_string()));
        }
        Ok(())
    }

    fn parse_add_lines(&mut self) -> DiffResult<String> {
        let mut added: Vec<&str> = Vec::new();
        while !self.is_done(&[
            END_PATCH_MARKER,
            UPDATE_FILE_MARKER,
            DELETE_FILE_MARKER,
            ADD_FILE_MARKER,
        ]) {
            let line = self.read_line();
            match line.strip_prefix('+') {
                Some(payload) => added.push(payload),
                None => return Err(DiffError::BadAddLine(line.to_string())),
            }
        }
        Ok(added.join("\n"))
    }

    /// Parse the hunks of one update action, anchoring each against the
    /// target file's lines as it goes.
    fn parse_update_hunks(&mut self, text: &str) -> DiffResult<Vec<Chunk>> {
        let file_lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let mut chunks: Vec<Chunk> = Vec::new();
        // Position in `file_lines` past which the next hunk must match.
        let mut cursor = 0usize;

        while !self.is_done(&[
            END_PATCH_MARKER,
            UPDATE_FILE_MARKER,
            DELETE_FILE_MARKER,
            ADD_FILE_MARKER,
            EOF_MARKER,
        ]) {
            let anchor = self.read_prefix(CHANGE_CONTEXT_MARKER);
            let mut has_header = anchor.is_some();
            if !has_header && self.cur_line() == EMPTY_CHANGE_CONTEXT_MARKER {
                self.index += 1;
                has_header = true;
            }
            // Only the first hunk of an update may omit its @@ header.
            if !has_header && cursor != 0 {
                return Err(DiffError::BadSectionLine(self.cur_line().to_string()));
            }

            if let Some(anchor) = anchor.filter(|a| !a.trim().is_empty()) {
                cursor = self.seek_anchor(&file_lines, cursor, anchor)?;
            }

            let (old, mut section_chunks, eof) = self.peek_section()?;
            let Some((match_index, fuzz)) = find_context(&file_lines, &old, cursor, eof) else {
                return Err(DiffError::InvalidContext {
                    context: old.join("\n"),
                    eof,
                });
            };
            self.fuzz += fuzz;
            for chunk in &mut section_chunks {
                chunk.orig_index += match_index;
            }
            chunks.append(&mut section_chunks);
            cursor = match_index + old.len();
        }

        Ok(chunks)
    }

    /// Advance the file cursor past the line named by an `@@ anchor`.
    ///
    /// An anchor that already occurred before the cursor is ignored and the
    /// cursor left alone; the hunk's own context lines then disambiguate
    /// between repeated anchors. The trim tier charges one fuzz.
    fn seek_anchor(
        &mut self,
        file_lines: &[String],
        cursor: usize,
        anchor: &str,
    ) -> DiffResult<usize> {
        let seen_exact = file_lines[..cursor].iter().any(|l| l == anchor);
        if !seen_exact {
            if let Some(offset) = file_lines[cursor..].iter().position(|l| l == anchor) {
                return Ok(cursor + offset + 1);
            }
        }
        let trimmed = anchor.trim();
        let seen_trimmed = file_lines[..cursor].iter().any(|l| l.trim() == trimmed);
        if !seen_trimmed {
            if let Some(offset) = file_lines[cursor..]
                .iter()
                .position(|l| l.trim() == trimmed)
            {
                self.fuzz += 1;
                return Ok(cursor + offset + 1);
            }
        }
        if seen_exact || seen_trimmed {
            return Ok(cursor);
        }
        Err(DiffError::InvalidContext {
            context: anchor.to_string(),
            eof: false,
        })
    }

    /// Collect one hunk body: the pre-patch context (`old`) plus the chunks
    /// it produces, with `orig_index` still relative to `old`.
    fn peek_section(&mut self) -> DiffResult<(Vec<String>, Vec<Chunk>, bool)> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mode {
            Keep,
            Add,
            Delete,
        }

        let start = self.index;
        let mut old: Vec<String> = Vec::new();
        let mut del_lines: Vec<String> = Vec::new();
        let mut ins_lines: Vec<String> = Vec::new();
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut mode = Mode::Keep;

        while self.index < self.lines.len() {
            let line = self.cur_line();
            if line == HUNK_BREAK_MARKER
                || line.starts_with(EMPTY_CHANGE_CONTEXT_MARKER)
                || line.starts_with(END_PATCH_MARKER)
                || line.starts_with(UPDATE_FILE_MARKER)
                || line.starts_with(DELETE_FILE_MARKER)
                || line.starts_with(ADD_FILE_MARKER)
                || line.starts_with(EOF_MARKER)
            {
                break;
            }
            if line.starts_with(HUNK_BREAK_MARKER) {
                return Err(DiffError::BadSectionLine(line.to_string()));
            }
            self.index += 1;

            // An entirely blank line inside a hunk stands for a keep-line
            // holding a single space; authors rarely emit the prefix there.
            let line = if line.is_empty() { " " } else { line };
            let last_mode = mode;
            mode = match line.as_bytes()[0] {
                b'+' => Mode::Add,
                b'-' => Mode::Delete,
                b' ' => Mode::Keep,
                _ => return Err(DiffError::BadSectionLine(line.to_string())),
            };
            let payload = &line[1..];

            // Returning to context closes the pending chunk.
            if mode == Mode::Keep
                && last_mode != mode
                && (!ins_lines.is_empty() || !del_lines.is_empty())
            {
                chunks.push(Chunk {
                    orig_index: old.len() - del_lines.len(),
                    del_lines: std::mem::take(&mut del_lines),
                    ins_lines: std::mem::take(&mut ins_lines),
                });
            }

            match mode {
                Mode::Delete => {
                    del_lines.push(payload.to_string());
                    old.push(payload.to_string());
                }
                Mode::Add => ins_lines.push(payload.to_string()),
                Mode::Keep => old.push(payload.to_string()),
            }
        }
        if !ins_lines.is_empty() || !del_lines.is_empty() {
            chunks.push(Chunk {
                orig_index: old.len() - del_lines.len(),
                del_lines,
                ins_lines,
            });
        }

        if self.index == start {
            return Err(DiffError::EmptySection(self.cur_line().to_string()));
        }

        let eof = self.cur_line() == EOF_MARKER;
        if eof {
            self.index += 1;
        }
        Ok((old, chunks, eof))
    }
}
