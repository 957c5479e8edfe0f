//! Comment submission

mod form;

pub use form::{CommentForm, CommentInput, FormState};
