//! Post and Author documents as returned by the content lake

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::blocks::Block;
use super::comment::Comment;

/// Treat an explicit `null` the same as a missing field.
///
/// GROQ projections emit `null` for every projected field a document lacks,
/// so plain `#[serde(default)]` is not enough.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A reference to another document or asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub target: String,
}

/// URL slug object (`{ "current": "hello-world" }`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default, deserialize_with = "null_default")]
    pub current: String,
}

/// An image field pointing at an uploaded asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<Reference>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Post author, dereferenced through `author->`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// A post as listed on the home page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: Slug,
    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub author: Option<Author>,
}

/// A full post with its body and approved comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "null_default")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_default")]
    pub body: Vec<Block>,
}

impl Post {
    /// Comments that may be shown on this post's page, in arrival order
    pub fn visible_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments
            .iter()
            .filter(move |c| c.is_visible_on(&self.id))
    }
}
