//! `mend` applies LLM-generated pseudo-diff patches to text files.
//!
//! The heart of the crate is [`patch`], a pure engine mapping
//! `(patch_text, files) -> files` with context-anchored, fuzz-tolerant
//! hunks. [`llm`] synthesizes patches from natural-language tasks and
//! [`command`]/[`cli`] wrap both in the `mend` binary.

pub mod cli;
pub mod command;
pub mod llm;
pub mod patch;
