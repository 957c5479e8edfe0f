//! Comment documents and the comment write payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::post::{null_default, Reference};

/// A reader comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub comment: String,
    /// Moderation flag; comments stay hidden until an editor sets it
    #[serde(rename = "Approved", default, deserialize_with = "null_default")]
    pub approved: bool,
    #[serde(default)]
    pub post: Option<Reference>,
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether this comment may be rendered on the page of `post_id`
    pub fn is_visible_on(&self, post_id: &str) -> bool {
        self.approved && self.post.as_ref().is_some_and(|r| r.target == post_id)
    }
}

/// A required comment field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Comment,
}

impl Field {
    /// Inline message shown next to the form when the field is empty
    pub fn message(&self) -> &'static str {
        match self {
            Field::Name => "The Name Field is required!",
            Field::Email => "The Email Field is required!",
            Field::Comment => "The Comment Field is required!",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::Comment => write!(f, "comment"),
        }
    }
}

/// Comment submission as posted by the form: `{_id, name, email, comment}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComment {
    /// Id of the post being commented on
    #[serde(rename = "_id", default)]
    pub post_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
}

impl NewComment {
    /// Required fields that are empty, in form order
    pub fn missing_fields(&self) -> Vec<Field> {
        [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Comment, &self.comment),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// The unapproved `comment` document to create
    pub fn to_document(&self) -> Value {
        json!({
            "_type": "comment",
            "post": {
                "_type": "reference",
                "_ref": self.post_id,
            },
            "name": self.name,
            "email": self.email,
            "comment": self.comment,
        })
    }
}

/// Result of a successful create mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDocument {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(approved: bool, post: Option<&str>) -> Comment {
        Comment {
            id: "c1".to_string(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            comment: "Nice".to_string(),
            approved,
            post: post.map(|p| Reference {
                target: p.to_string(),
            }),
            created_at: None,
        }
    }

    #[test]
    fn test_visibility_requires_approval_and_matching_post() {
        assert!(comment(true, Some("p1")).is_visible_on("p1"));
        assert!(!comment(false, Some("p1")).is_visible_on("p1"));
        assert!(!comment(true, Some("p2")).is_visible_on("p1"));
        assert!(!comment(true, None).is_visible_on("p1"));
    }

    #[test]
    fn test_missing_approval_flag_means_hidden() {
        let c: Comment = serde_json::from_str(
            r#"{"_id":"c1","name":"Ann","comment":"hi","post":{"_ref":"p1"}}"#,
        )
        .unwrap();
        assert!(!c.approved);
        assert!(!c.is_visible_on("p1"));
    }

    #[test]
    fn test_missing_fields() {
        let input = NewComment {
            post_id: "p1".to_string(),
            name: "Ann".to_string(),
            email: "  ".to_string(),
            comment: String::new(),
        };
        assert_eq!(input.missing_fields(), vec![Field::Email, Field::Comment]);
    }

    #[test]
    fn test_document_has_no_approval_flag() {
        let input: NewComment = serde_json::from_str(
            r#"{"_id":"p1","name":"Ann","email":"ann@example.com","comment":"Hi"}"#,
        )
        .unwrap();
        let doc = input.to_document();
        assert_eq!(doc["_type"], "comment");
        assert_eq!(doc["post"]["_ref"], "p1");
        assert_eq!(doc["post"]["_type"], "reference");
        assert!(doc.get("Approved").is_none());
    }
}
