//! Content module - documents read from and written to the content lake

mod blocks;
mod comment;
mod post;

pub use blocks::{Block, MarkDef, Span, MAX_LIST_LEVEL};
pub use comment::{Comment, CreatedDocument, Field, NewComment};
pub use post::{Author, ImageRef, Post, PostSummary, Reference, Slug};
