//! Portable Text blocks making up a post body

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::post::{null_default, Reference};

/// Deepest list nesting rendered; deeper items are flattened to this level
pub const MAX_LIST_LEVEL: usize = 6;

/// One entry of a rich-text body.
///
/// Text blocks have `_type == "block"` and carry spans; any other `_type`
/// (images, embeds) keeps its remaining fields in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(rename = "listItem", default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<usize>,
    #[serde(default, deserialize_with = "null_default")]
    pub children: Vec<Span>,
    #[serde(rename = "markDefs", default, deserialize_with = "null_default")]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default)]
    pub asset: Option<Reference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Whether this is a text block
    pub fn is_text(&self) -> bool {
        self.kind == "block"
    }

    /// Tag used to pick a renderer: the style of a text block (`li` for list
    /// items), the `_type` of anything else
    pub fn tag(&self) -> &str {
        if !self.is_text() {
            return &self.kind;
        }
        if self.list_item.is_some() {
            return "li";
        }
        self.style.as_deref().unwrap_or("normal")
    }

    /// Nesting depth of a list item, 1 to [`MAX_LIST_LEVEL`]
    pub fn list_level(&self) -> usize {
        self.level.unwrap_or(1).clamp(1, MAX_LIST_LEVEL)
    }

    /// Look up the annotation a span mark points at
    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|def| def.key == key)
    }
}

/// A run of text inside a block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub text: String,
    /// Decorator names (`strong`, `em`) or keys into the block's `markDefs`
    #[serde(default, deserialize_with = "null_default")]
    pub marks: Vec<String>,
}

/// An annotation such as a link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
