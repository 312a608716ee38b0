use super::repo_types::Comment;
use crate::validation::FieldErrors;

pub const COMMENT_MIN_LEN: usize = 5;
pub const COMMENT_TOO_SHORT: &str = "Comment must be at least 5 characters long.";

/// Only the author may edit or delete a comment.
pub fn can_mutate(comment: &Comment, requester_id: i32) -> bool {
    comment.account_id == requester_id
}

/// Trimmed comment text, at least `COMMENT_MIN_LEN` characters long.
pub fn validate_comment_text(raw: &str) -> Result<String, FieldErrors> {
    let text = raw.trim();
    let mut errors = FieldErrors::new();
    errors.check(
        text.chars().count() >= COMMENT_MIN_LEN,
        "comment_text",
        COMMENT_TOO_SHORT,
    );
    errors.finish(text.to_string())
}
