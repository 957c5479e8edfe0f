//! In-process content store over a list of raw documents
//!
//! Evaluates the same projections as the GROQ queries in [`super::queries`],
//! so pages render identically whether they are backed by a live project or
//! a dataset export.

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::error::{Result, StoreError};
use super::ContentStore;
use crate::content::{CreatedDocument, NewComment, Post, PostSummary};

#[derive(Debug, Default)]
struct Dataset {
    documents: Vec<Value>,
    /// Ids of comments created through this store
    created: Vec<String>,
}

/// Content store holding documents in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    dataset: Mutex<Dataset>,
    read_only: bool,
}

impl MemoryStore {
    /// Create a store from raw documents
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            dataset: Mutex::new(Dataset {
                documents,
                created: Vec::new(),
            }),
            read_only: false,
        }
    }

    /// Load a dataset export: a JSON array or newline-delimited JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnyResult<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let documents = parse_documents(&content)
            .with_context(|| format!("Failed to parse documents in {:?}", path))?;
        tracing::info!("Loaded {} document(s) from {:?}", documents.len(), path);
        Ok(Self::new(documents))
    }

    /// Reject every write
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Comment documents created through this store, oldest first
    pub fn created_comments(&self) -> Vec<Value> {
        let dataset = self.lock();
        dataset
            .created
            .iter()
            .filter_map(|id| {
                dataset.documents.iter().find(|d| has_id(d, id)).cloned()
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Dataset> {
        match self.dataset.lock() {
            Ok(dataset) => dataset,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn snapshot(&self) -> Vec<Value> {
        self.lock().documents.clone()
    }
}

fn parse_documents(content: &str) -> serde_json::Result<Vec<Value>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content);
    }
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}

fn field(doc: &Value, name: &str) -> Value {
    doc.get(name).cloned().unwrap_or(Value::Null)
}

fn has_type(doc: &Value, kind: &str) -> bool {
    doc.get("_type").and_then(Value::as_str) == Some(kind)
}

fn has_id(doc: &Value, id: &str) -> bool {
    doc.get("_id").and_then(Value::as_str) == Some(id)
}

fn slug_of(doc: &Value) -> Option<&str> {
    doc.get("slug")?.get("current")?.as_str()
}

/// `author->{name, image}`
fn project_author(doc: &Value, docs: &[Value]) -> Value {
    let author = match doc.get("author") {
        Some(author) => author,
        None => return Value::Null,
    };
    let target = match author.get("_ref").and_then(Value::as_str) {
        Some(id) => docs.iter().find(|d| has_id(d, id)),
        None => Some(author),
    };
    match target {
        Some(a) => json!({ "name": field(a, "name"), "image": field(a, "image") }),
        None => Value::Null,
    }
}

/// `*[_type == "comment" && post._ref == ^._id && Approved == true]`
fn approved_comments(post_id: &str, docs: &[Value]) -> Vec<Value> {
    docs.iter()
        .filter(|d| has_type(d, "comment"))
        .filter(|d| {
            d.get("post")
                .and_then(|p| p.get("_ref"))
                .and_then(Value::as_str)
                == Some(post_id)
        })
        .filter(|d| d.get("Approved") == Some(&Value::Bool(true)))
        .cloned()
        .collect()
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_posts(&self) -> Result<Vec<PostSummary>> {
        let docs = self.snapshot();
        docs.iter()
            .filter(|d| has_type(d, "post"))
            .map(|doc| {
                let projected = json!({
                    "_id": field(doc, "_id"),
                    "title": field(doc, "title"),
                    "slug": field(doc, "slug"),
                    "mainImage": field(doc, "mainImage"),
                    "_createdAt": field(doc, "_createdAt"),
                    "description": field(doc, "description"),
                    "author": project_author(doc, &docs),
                });
                serde_json::from_value(projected).map_err(StoreError::from)
            })
            .collect()
    }

    async fn fetch_post(&self, slug: &str) -> Result<Option<Post>> {
        let docs = self.snapshot();
        let doc = match docs
            .iter()
            .find(|d| has_type(d, "post") && slug_of(d) == Some(slug))
        {
            Some(doc) => doc,
            None => return Ok(None),
        };

        let id = doc.get("_id").and_then(Value::as_str).unwrap_or_default();
        let projected = json!({
            "_id": field(doc, "_id"),
            "_createdAt": field(doc, "_createdAt"),
            "title": field(doc, "title"),
            "author": project_author(doc, &docs),
            "comments": approved_comments(id, &docs),
            "description": field(doc, "description"),
            "mainImage": field(doc, "mainImage"),
            "slug": field(doc, "slug"),
            "body": field(doc, "body"),
        });
        Ok(Some(serde_json::from_value(projected)?))
    }

    async fn fetch_slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .snapshot()
            .iter()
            .filter(|d| has_type(d, "post"))
            .filter_map(|d| slug_of(d).map(str::to_string))
            .collect())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<CreatedDocument> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }

        let mut dataset = self.lock();
        let target_exists = dataset
            .documents
            .iter()
            .any(|d| has_type(d, "post") && has_id(d, &comment.post_id));
        if !target_exists {
            return Err(StoreError::MissingReference(comment.post_id.clone()));
        }

        // Ids must stay unique across loaded and created documents
        let mut n = dataset.created.len() + 1;
        let id = loop {
            let candidate = format!("comment-{}", n);
            if !dataset.documents.iter().any(|d| has_id(d, &candidate)) {
                break candidate;
            }
            n += 1;
        };
        let mut doc = comment.to_document();
        if let Value::Object(map) = &mut doc {
            map.insert("_id".to_string(), json!(id));
            map.insert("_createdAt".to_string(), json!(chrono::Utc::now()));
        }
        dataset.documents.push(doc);
        dataset.created.push(id.clone());
        tracing::debug!("Stored comment {} in memory", id);

        Ok(CreatedDocument { id })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small dataset: one author, two posts, and comments in mixed states
    pub(crate) fn fixture() -> MemoryStore {
        MemoryStore::new(vec![
            json!({ "_id": "a1", "_type": "author", "name": "Ada",
                    "image": { "asset": { "_ref": "image-face-64x64-png" } } }),
            json!({ "_id": "p1", "_type": "post", "title": "Hello",
                    "slug": { "current": "hello" },
                    "description": "First post",
                    "_createdAt": "2022-01-05T10:30:00Z",
                    "mainImage": { "asset": { "_ref": "image-cover-1200x800-jpg" } },
                    "author": { "_ref": "a1" },
                    "body": [
                        { "_type": "block", "style": "h1",
                          "children": [{ "_type": "span", "text": "Welcome" }] },
                        { "_type": "block", "style": "normal",
                          "children": [{ "_type": "span", "text": "Body text" }] }
                    ] }),
            json!({ "_id": "c0", "_type": "comment", "name": "Hidden", "comment": "pending",
                    "Approved": false, "post": { "_ref": "p1" } }),
            json!({ "_id": "c1", "_type": "comment", "name": "Ann", "comment": "Great read",
                    "Approved": true, "post": { "_ref": "p1" } }),
            json!({ "_id": "c2", "_type": "comment", "name": "Bob", "comment": "Other post",
                    "Approved": true, "post": { "_ref": "p2" } }),
            json!({ "_id": "p2", "_type": "post", "title": "Quiet",
                    "slug": { "current": "quiet" }, "author": { "_ref": "a1" } }),
        ])
    }

    #[tokio::test]
    async fn test_fetch_posts_projects_author() {
        let store = fixture();
        let posts = store.fetch_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug.current, "hello");
        assert_eq!(posts[0].author.as_ref().unwrap().name, "Ada");
        assert_eq!(posts[1].description, "");
    }

    #[tokio::test]
    async fn test_fetch_post_joins_only_approved_comments() {
        let store = fixture();
        let post = store.fetch_post("hello").await.unwrap().unwrap();
        let names: Vec<_> = post.comments.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ann"]);
        assert_eq!(post.body.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_post_unknown_slug() {
        let store = fixture();
        assert!(store.fetch_post("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_slugs() {
        let store = fixture();
        assert_eq!(store.fetch_slugs().await.unwrap(), vec!["hello", "quiet"]);
    }

    #[tokio::test]
    async fn test_created_comment_stays_hidden() {
        let store = fixture();
        let created = store
            .create_comment(&NewComment {
                post_id: "p1".to_string(),
                name: "Eve".to_string(),
                email: "eve@example.com".to_string(),
                comment: "New".to_string(),
            })
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(store.created_comments().len(), 1);

        let post = store.fetch_post("hello").await.unwrap().unwrap();
        assert!(post.comments.iter().all(|c| c.name != "Eve"));
    }

    fn eve(post_id: &str) -> NewComment {
        NewComment {
            post_id: post_id.to_string(),
            name: "Eve".to_string(),
            email: "eve@example.com".to_string(),
            comment: "New".to_string(),
        }
    }

    #[tokio::test]
    async fn test_created_id_skips_loaded_ids() {
        let store = MemoryStore::new(vec![
            json!({ "_id": "p1", "_type": "post", "slug": { "current": "hello" } }),
            json!({ "_id": "comment-1", "_type": "comment", "name": "Old",
                    "Approved": true, "post": { "_ref": "p1" } }),
        ]);

        let created = store.create_comment(&eve("p1")).await.unwrap();
        assert_ne!(created.id, "comment-1");

        let same_id = store
            .snapshot()
            .iter()
            .filter(|d| has_id(d, &created.id))
            .count();
        assert_eq!(same_id, 1);

        let comments = store.created_comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["name"], "Eve");
    }

    #[tokio::test]
    async fn test_comment_on_unknown_post_is_rejected() {
        let store = fixture();
        let result = store.create_comment(&eve("no-such-post")).await;
        assert!(matches!(
            result,
            Err(StoreError::MissingReference(ref id)) if id == "no-such-post"
        ));
        assert!(store.created_comments().is_empty());
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let store = fixture().read_only();
        let result = store.create_comment(&NewComment::default()).await;
        assert!(matches!(result, Err(StoreError::ReadOnly)));
        assert!(store.created_comments().is_empty());
    }

    #[test]
    fn test_parse_ndjson_and_array() {
        let ndjson = "{\"_id\":\"a\"}\n\n{\"_id\":\"b\"}\n";
        assert_eq!(parse_documents(ndjson).unwrap().len(), 2);
        assert_eq!(parse_documents("[{\"_id\":\"a\"}]").unwrap().len(), 1);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.ndjson");
        fs::write(&path, "{\"_id\":\"p1\",\"_type\":\"post\"}\n").unwrap();
        let store = MemoryStore::from_file(&path).unwrap();
        assert_eq!(store.snapshot().len(), 1);
    }
}
