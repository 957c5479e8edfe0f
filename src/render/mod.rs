//! Page rendering with embedded Tera templates
//!
//! Templates are compiled into the binary. Autoescaping stays on for every
//! `.html` template since comment text comes straight from readers; only the
//! pre-rendered post body is marked `safe`.

mod portable_text;

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

pub use portable_text::{
    BlockProps, BlockRenderer, MarkRenderer, PortableText, BLOCK_RENDERERS,
    DEFAULT_BLOCK_RENDERER, MARK_RENDERERS,
};

use crate::comments::{CommentForm, FormState};
use crate::config::SiteConfig;
use crate::content::{Post, PostSummary};
use crate::helpers::{post_path, post_url, published_at, url_for, ImageUrlBuilder};

/// Renders the list, detail and not-found pages
pub struct PageRenderer {
    tera: Tera,
    site: SiteData,
    images: ImageUrlBuilder,
    body: PortableText,
}

impl PageRenderer {
    /// Create a renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("templates/layout.html")),
            ("index.html", include_str!("templates/index.html")),
            ("post.html", include_str!("templates/post.html")),
            ("not_found.html", include_str!("templates/not_found.html")),
            (
                "partials/header.html",
                include_str!("templates/partials/header.html"),
            ),
            (
                "partials/comment_form.html",
                include_str!("templates/partials/comment_form.html"),
            ),
            (
                "partials/comments.html",
                include_str!("templates/partials/comments.html"),
            ),
        ])?;

        let images = ImageUrlBuilder::new(&config.sanity);
        Ok(Self {
            tera,
            site: SiteData {
                title: config.title.clone(),
                tagline: config.tagline.clone(),
                description: config.description.clone(),
                home: url_for(config, "/"),
            },
            body: PortableText::new(images.clone()),
            images,
        })
    }

    /// Home page: one card per post, in the order given
    pub fn render_index(
        &self,
        config: &SiteConfig,
        posts: &[PostSummary],
    ) -> tera::Result<String> {
        let cards: Vec<PostCard> = posts
            .iter()
            .map(|post| PostCard {
                title: post.title.clone(),
                description: post.description.clone(),
                href: post_path(config, &post.slug.current),
                image: self.images.url(post.main_image.as_ref()),
                author_name: author_name(post.author.as_ref()),
                author_image: self
                    .images
                    .url(post.author.as_ref().and_then(|a| a.image.as_ref())),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &cards);
        self.tera.render("index.html", &context)
    }

    /// Detail page: metadata, body, comment form and approved comments
    pub fn render_post(
        &self,
        config: &SiteConfig,
        post: &Post,
        form: &CommentForm,
    ) -> tera::Result<String> {
        let view = PostView {
            id: post.id.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            image: self.images.url(post.main_image.as_ref()),
            author_name: author_name(post.author.as_ref()),
            author_image: self
                .images
                .url(post.author.as_ref().and_then(|a| a.image.as_ref())),
            published_at: post.created_at.as_ref().map(published_at),
            body: self.body.render(&post.body),
            action: format!("{}/comment", post_path(config, &post.slug.current)),
        };
        let comments: Vec<CommentView> = post
            .visible_comments()
            .map(|c| CommentView {
                name: c.name.clone(),
                comment: c.comment.clone(),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("page_title", &post.title);
        context.insert("canonical", &post_url(config, &post.slug.current));
        context.insert("post", &view);
        context.insert("comments", &comments);
        context.insert("form", &FormView::from(form));
        self.tera.render("post.html", &context)
    }

    /// Page shown for unknown slugs and routes
    pub fn render_not_found(&self, path: &str) -> tera::Result<String> {
        let mut context = self.base_context();
        context.insert("page_title", "Not found");
        context.insert("path", path);
        self.tera.render("not_found.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }
}

fn author_name(author: Option<&crate::content::Author>) -> String {
    author.map(|a| a.name.clone()).unwrap_or_default()
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub home: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub description: String,
    pub href: String,
    pub image: Option<String>,
    pub author_name: String,
    pub author_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub author_name: String,
    pub author_image: Option<String>,
    pub published_at: Option<String>,
    /// Rendered HTML
    pub body: String,
    /// Where the comment form posts to
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub name: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub show_form: bool,
    pub failed: bool,
    pub name: String,
    pub email: String,
    pub comment: String,
    /// Inline messages for empty required fields
    pub errors: Vec<&'static str>,
}

impl From<&CommentForm> for FormView {
    fn from(form: &CommentForm) -> Self {
        let input = form.input();
        Self {
            show_form: form.shows_form(),
            failed: *form.state() == FormState::Failed,
            name: input.name.clone(),
            email: input.email.clone(),
            comment: input.comment.clone(),
            errors: form.errors().iter().map(|f| f.message()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::CommentInput;
    use crate::store::{fixture, ContentStore};
    use serde_json::json;

    fn renderer() -> (SiteConfig, PageRenderer) {
        let mut config = SiteConfig::default();
        config.sanity.project_id = "abc123".to_string();
        let renderer = PageRenderer::new(&config).unwrap();
        (config, renderer)
    }

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_index_single_card() {
        let (config, renderer) = renderer();
        let posts: Vec<PostSummary> = serde_json::from_value(json!([
            { "_id": "p1", "slug": { "current": "hello" }, "title": "Hello" }
        ]))
        .unwrap();

        let html = renderer.render_index(&config, &posts).unwrap();
        assert_eq!(html.matches(r#"class="post-card""#).count(), 1);
        assert!(html.contains(r#"href="/post/hello""#));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_index_every_card_links_to_its_slug() {
        let (config, renderer) = renderer();
        let posts: Vec<PostSummary> = serde_json::from_value(json!([
            { "_id": "p1", "slug": { "current": "one" }, "title": "One" },
            { "_id": "p2", "slug": { "current": "two" }, "title": "Two" },
            { "_id": "p3", "slug": { "current": "three" }, "title": "Three" }
        ]))
        .unwrap();

        let html = renderer.render_index(&config, &posts).unwrap();
        assert_eq!(html.matches(r#"class="post-card""#).count(), 3);
        for post in &posts {
            assert!(html.contains(&format!(r#"href="/post/{}""#, post.slug.current)));
        }
    }

    #[test]
    fn test_index_empty_grid() {
        let (config, renderer) = renderer();
        let html = renderer.render_index(&config, &[]).unwrap();
        assert!(html.contains(r#"class="post-grid""#));
        assert!(!html.contains(r#"class="post-card""#));
    }

    #[test]
    fn test_post_without_comments_shows_header_only() {
        let (config, renderer) = renderer();
        let post = post(json!({ "_id": "p1", "title": "Hello", "slug": { "current": "hello" } }));

        let html = renderer
            .render_post(&config, &post, &CommentForm::new("p1"))
            .unwrap();
        assert!(html.contains("<h3 class=\"comments-title\">Comments</h3>"));
        assert!(!html.contains(r#"class="comment""#));
    }

    #[test]
    fn test_unapproved_comments_never_rendered() {
        let (config, renderer) = renderer();
        let post = post(json!({
            "_id": "p1", "title": "Hello", "slug": { "current": "hello" },
            "comments": [
                { "_id": "c1", "name": "Sneaky", "comment": "unapproved-text",
                  "Approved": false, "post": { "_ref": "p1" } },
                { "_id": "c2", "name": "Ann", "comment": "approved-text",
                  "Approved": true, "post": { "_ref": "p1" } },
                { "_id": "c3", "name": "Other", "comment": "foreign-text",
                  "Approved": true, "post": { "_ref": "p9" } }
            ]
        }));

        let html = renderer
            .render_post(&config, &post, &CommentForm::new("p1"))
            .unwrap();
        assert!(html.contains("approved-text"));
        assert!(!html.contains("unapproved-text"));
        assert!(!html.contains("foreign-text"));
        assert_eq!(html.matches(r#"class="comment""#).count(), 1);
    }

    #[test]
    fn test_comment_text_is_escaped() {
        let (config, renderer) = renderer();
        let post = post(json!({
            "_id": "p1", "slug": { "current": "hello" },
            "comments": [{ "_id": "c1", "name": "<b>x</b>", "comment": "<script>alert(1)</script>",
                           "Approved": true, "post": { "_ref": "p1" } }]
        }));

        let html = renderer
            .render_post(&config, &post, &CommentForm::new("p1"))
            .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_post_renders_body_and_metadata() {
        let (config, renderer) = renderer();
        let post = post(json!({
            "_id": "p1", "title": "Hello", "description": "Intro",
            "slug": { "current": "hello" },
            "_createdAt": "2022-01-05T10:30:00Z",
            "author": { "name": "Ada" },
            "body": [{ "_type": "block", "style": "h2",
                       "children": [{ "_type": "span", "text": "Section" }] }]
        }));

        let html = renderer
            .render_post(&config, &post, &CommentForm::new("p1"))
            .unwrap();
        assert!(html.contains(r#"<h2 class="my-5 text-xl font-bold">Section</h2>"#));
        assert!(html.contains("Ada"));
        assert!(html.contains("Published at"));
        assert!(html.contains(r#"action="/post/hello/comment""#));
        assert!(html.contains(r#"name="_id" value="p1""#));
        assert!(html.contains(r#"<link rel="canonical" href="http://localhost:3000/post/hello">"#));
    }

    #[tokio::test]
    async fn test_submitted_form_replaced_by_thank_you() {
        let (config, renderer) = renderer();
        let store = fixture();
        let post = store.fetch_post("hello").await.unwrap().unwrap();
        let mut form = CommentForm::with_input(
            post.id.clone(),
            CommentInput {
                name: "Eve".to_string(),
                email: "eve@example.com".to_string(),
                comment: "Lovely".to_string(),
            },
        );
        form.submit(&store).await;

        let html = renderer.render_post(&config, &post, &form).unwrap();
        assert!(html.contains("Thank you for submitting your comment!"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn test_incomplete_form_shows_inline_messages() {
        let (config, renderer) = renderer();
        let store = fixture();
        let post = store.fetch_post("hello").await.unwrap().unwrap();
        let mut form = CommentForm::with_input(
            post.id.clone(),
            CommentInput {
                name: "Eve".to_string(),
                ..CommentInput::default()
            },
        );
        form.submit(&store).await;

        let html = renderer.render_post(&config, &post, &form).unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("The Email Field is required!"));
        assert!(html.contains("The Comment Field is required!"));
        assert!(!html.contains("The Name Field is required!"));
        assert!(html.contains(r#"value="Eve""#));
    }

    #[test]
    fn test_not_found_page() {
        let (_, renderer) = renderer();
        let html = renderer.render_not_found("/post/missing").unwrap();
        assert!(html.contains("missing"));
        assert!(html.contains("404"));
    }
}
