/// Default marker for whole-line comments in survey exports.
pub const DEFAULT_COMMENT_CHAR: char = '*';

/// Drop blank lines and whole-line comments.
///
/// Lines are split on `\n`. A line is dropped when it is empty after trimming
/// or when its trimmed form starts with `comment_char`. Surviving lines are
/// kept verbatim (including any `\r`) and joined with `\n`.
pub fn clean(text: &str, comment_char: char) -> String {
    text.split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with(comment_char)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
