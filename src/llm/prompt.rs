//! Prompt assembly for the patch synthesizer, plus extraction of the framed
//! patch from a model reply.

/// System prompt teaching the patch language.
pub const PATCH_SYSTEM_PROMPT: &str = r#"You edit files by producing a patch in a stripped-down, file-oriented diff format. Reply with the patch and nothing else, wrapped in the envelope:

*** Begin Patch
[ one or more file sections ]
*** End Patch

Each file section starts with one of three headers:

*** Add File: <path> - create a new file. Every following line is a + line holding the initial contents.
*** Delete File: <path> - remove an existing file. Nothing follows.
*** Update File: <path> - patch an existing file in place. May be immediately followed by *** Move to: <new path> to rename it.

An update contains one or more hunks, each introduced by @@ (optionally followed by the enclosing class or function header when the snippet alone is ambiguous). Within a hunk every line starts with:

 " " (space) for context that stays unchanged
 "-" for a line to remove
 "+" for a line to add

Show about 3 lines of context above and below each change. Do not include line numbers; the context lines locate the change. If a change touches the last lines of the file, follow the hunk with *** End of File.

Example:

*** Begin Patch
*** Update File: src/app.py
@@ def greet():
-print("Hi")
+print("Hello, world!")
*** End Patch
"#;

/// User prompt carrying the file and the requested change.
pub fn render_task_prompt(path: &str, content: &str, task: &str) -> String {
    format!(
        "File: {path}\n\
         -----\n\
         {content}\n\
         -----\n\
         Task: {task}\n\
         Produce a patch that performs this edit to {path}."
    )
}

/// Extracts the framed patch from a model reply, tolerating prose or code
/// fences around the envelope. Returns the text from `*** Begin Patch`
/// through `*** End Patch` inclusive.
pub fn extract_patch(reply: &str) -> Option<String> {
    const BEGIN: &str = "*** Begin Patch";
    const END: &str = "*** End Patch";

    let start = reply.find(BEGIN)?;
    let end = reply[start..].find(END)? + start + END.len();
    Some(reply[start..end].to_string())
}
