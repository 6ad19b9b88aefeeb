//! The single failure type of the patch engine.

use thiserror::Error;

/// Everything that can go wrong between patch text and applied files.
///
/// The variant is the reason category; `Display` carries the
/// human-readable message shown to callers and end users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The outer `*** Begin Patch` / `*** End Patch` frame is broken.
    #[error("invalid patch framing: {0}")]
    Framing(String),

    #[error("unknown line at top level: '{0}'")]
    UnknownLine(String),

    #[error("duplicate action for path '{0}'")]
    DuplicateAction(String),

    #[error("missing file: '{0}'")]
    MissingFile(String),

    #[error("file already exists: '{0}'")]
    FileExists(String),

    #[error("invalid add-file line: '{0}'")]
    BadAddLine(String),

    #[error("invalid section line: '{0}'")]
    BadSectionLine(String),

    /// No position in the target file matched the hunk's context lines
    /// under any equality tier.
    #[error("invalid context (eof: {eof}):\n{context}")]
    InvalidContext { context: String, eof: bool },

    /// A chunk starts before the previous chunk's deletion range ended.
    #[error("overlapping chunks in '{path}' at line index {index}")]
    OverlappingChunks { path: String, index: usize },

    #[error("chunk index {index} exceeds the {len} lines of '{path}'")]
    RangeExceeded { path: String, index: usize, len: usize },

    #[error("empty hunk body before '{0}'")]
    EmptySection(String),

    #[error("patch ended before '*** End Patch'")]
    UnexpectedEof,
}

/// Result type for patch engine operations.
pub type DiffResult<T> = Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_context_display_embeds_eof_flag() {
        let err = DiffError::InvalidContext {
            context: "fn main() {".to_string(),
            eof: true,
        };
        let message = err.to_string();
        assert!(message.contains("eof: true"));
        assert!(message.contains("fn main() {"));
    }

    #[test]
    fn test_categories_are_distinguishable_by_message_prefix() {
        let framing = DiffError::Framing("no begin marker".to_string()).to_string();
        let missing = DiffError::MissingFile("a.txt".to_string()).to_string();
        assert!(framing.starts_with("invalid patch framing"));
        assert!(missing.starts_with("missing file"));
    }
}
