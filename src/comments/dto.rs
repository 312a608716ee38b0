use serde::Deserialize;

/// New comment body. `inv_id` stays a string so a tampered value can be
/// rejected with a redirect instead of a bare 422.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewCommentForm {
    pub inv_id: String,
    pub comment_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCommentForm {
    pub comment_id: String,
    pub comment_text: String,
}
