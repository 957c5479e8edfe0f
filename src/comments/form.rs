//! The "leave a comment" form

use serde::{Deserialize, Serialize};

use crate::content::{Field, NewComment};
use crate::store::ContentStore;

/// Display state of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FormState {
    /// Awaiting input
    Idle,
    /// A write is in flight
    Submitting,
    /// The comment was stored; terminal for this form
    Submitted { id: String },
    /// The last write failed; the form stays editable
    Failed,
}

/// Values posted by the HTML form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
}

/// A comment form bound to one post
#[derive(Debug, Clone)]
pub struct CommentForm {
    input: NewComment,
    state: FormState,
    errors: Vec<Field>,
}

impl CommentForm {
    /// An empty form for the post with id `post_id`
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            input: NewComment {
                post_id: post_id.into(),
                ..NewComment::default()
            },
            state: FormState::Idle,
            errors: Vec::new(),
        }
    }

    /// A form filled with posted values
    pub fn with_input(post_id: impl Into<String>, input: CommentInput) -> Self {
        let mut form = Self::new(post_id);
        form.input.name = input.name;
        form.input.email = input.email;
        form.input.comment = input.comment;
        form
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn input(&self) -> &NewComment {
        &self.input
    }

    /// Fields that failed the required check on the last submit
    pub fn errors(&self) -> &[Field] {
        &self.errors
    }

    /// Whether the input form (rather than the thank-you panel) is shown
    pub fn shows_form(&self) -> bool {
        !matches!(self.state, FormState::Submitted { .. })
    }

    /// Validate and write the comment.
    ///
    /// Empty required fields stop the submission before the store is
    /// touched. Submitting a form that is already in flight or submitted
    /// does nothing.
    pub async fn submit(&mut self, store: &dyn ContentStore) -> &FormState {
        if matches!(
            self.state,
            FormState::Submitting | FormState::Submitted { .. }
        ) {
            return &self.state;
        }

        self.errors = self.input.missing_fields();
        if !self.errors.is_empty() {
            tracing::debug!("Comment form incomplete: {:?}", self.errors);
            return &self.state;
        }

        self.state = FormState::Submitting;
        self.state = match store.create_comment(&self.input).await {
            Ok(created) => {
                tracing::info!(
                    "Comment {} submitted for post {}",
                    created.id,
                    self.input.post_id
                );
                FormState::Submitted { id: created.id }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to submit comment for post {}: {}",
                    self.input.post_id,
                    e
                );
                FormState::Failed
            }
        };
        &self.state
    }
}
