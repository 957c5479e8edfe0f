//! Portable Text to HTML
//!
//! Each block is rendered by the entry of [`BLOCK_RENDERERS`] matching its
//! tag (see [`Block::tag`]); tags without an entry use
//! [`DEFAULT_BLOCK_RENDERER`]. Span marks go through [`MARK_RENDERERS`] the
//! same way, except an unknown mark leaves its text unwrapped.

use std::collections::HashMap;

use crate::content::{Block, MarkDef};
use crate::helpers::{html_escape, is_safe_href, ImageUrlBuilder};

/// What a block renderer gets to work with
pub struct BlockProps<'a> {
    pub block: &'a Block,
    /// Already rendered inline content of a text block
    pub children: &'a str,
    pub images: &'a ImageUrlBuilder,
}

pub type BlockRenderer = fn(&BlockProps<'_>) -> String;

/// Wraps rendered text; `def` is the annotation for non-decorator marks
pub type MarkRenderer = fn(&str, Option<&MarkDef>) -> String;

pub const BLOCK_RENDERERS: &[(&str, BlockRenderer)] = &[
    ("h1", render_h1),
    ("h2", render_h2),
    ("h3", |p: &BlockProps<'_>| wrap("h3", p.children)),
    ("h4", |p: &BlockProps<'_>| wrap("h4", p.children)),
    ("h5", |p: &BlockProps<'_>| wrap("h5", p.children)),
    ("h6", |p: &BlockProps<'_>| wrap("h6", p.children)),
    ("normal", render_paragraph),
    ("blockquote", |p: &BlockProps<'_>| wrap("blockquote", p.children)),
    ("li", render_list_item),
    ("image", render_image),
];

pub const DEFAULT_BLOCK_RENDERER: BlockRenderer = render_default;

pub const MARK_RENDERERS: &[(&str, MarkRenderer)] = &[
    ("strong", |text: &str, _: Option<&MarkDef>| wrap("strong", text)),
    ("em", |text: &str, _: Option<&MarkDef>| wrap("em", text)),
    ("code", |text: &str, _: Option<&MarkDef>| wrap("code", text)),
    ("underline", render_underline),
    ("strike-through", |text: &str, _: Option<&MarkDef>| wrap("del", text)),
    ("link", render_link),
];

fn wrap(tag: &str, children: &str) -> String {
    format!("<{tag}>{children}</{tag}>")
}

fn render_h1(props: &BlockProps<'_>) -> String {
    format!(r#"<h1 class="my-5 text-2xl font-bold">{}</h1>"#, props.children)
}

fn render_h2(props: &BlockProps<'_>) -> String {
    format!(r#"<h2 class="my-5 text-xl font-bold">{}</h2>"#, props.children)
}

fn render_paragraph(props: &BlockProps<'_>) -> String {
    wrap("p", props.children)
}

fn render_list_item(props: &BlockProps<'_>) -> String {
    format!(r#"<li class="ml-4 list-disc">{}</li>"#, props.children)
}

fn render_image(props: &BlockProps<'_>) -> String {
    let block = props.block;
    let url = match block
        .asset
        .as_ref()
        .and_then(|asset| props.images.asset_url(&asset.target))
    {
        Some(url) => url,
        None => return String::new(),
    };
    let alt = block
        .extra
        .get("alt")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    format!(
        r#"<img class="my-5 w-full" src="{}" alt="{}">"#,
        html_escape(&url),
        html_escape(alt)
    )
}

fn render_default(props: &BlockProps<'_>) -> String {
    if props.block.is_text() {
        return render_paragraph(props);
    }
    tracing::debug!("No renderer for block type {:?}", props.block.kind);
    String::new()
}

fn render_underline(text: &str, _def: Option<&MarkDef>) -> String {
    format!(r#"<span style="text-decoration: underline">{}</span>"#, text)
}

fn render_link(text: &str, def: Option<&MarkDef>) -> String {
    match def.and_then(|d| d.href.as_deref()) {
        Some(href) if is_safe_href(href) => format!(
            r#"<a href="{}" class="text-blue-500 hover:underline">{}</a>"#,
            html_escape(href.trim()),
            text
        ),
        _ => text.to_string(),
    }
}

/// Renders rich-text bodies
#[derive(Clone)]
pub struct PortableText {
    blocks: HashMap<&'static str, BlockRenderer>,
    default_block: BlockRenderer,
    marks: HashMap<&'static str, MarkRenderer>,
    images: ImageUrlBuilder,
}

impl PortableText {
    /// Create a renderer with the built-in tables
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self {
            blocks: BLOCK_RENDERERS.iter().copied().collect(),
            default_block: DEFAULT_BLOCK_RENDERER,
            marks: MARK_RENDERERS.iter().copied().collect(),
            images,
        }
    }

    /// Render a whole body
    pub fn render(&self, body: &[Block]) -> String {
        let mut html = String::new();
        // Open list elements, innermost last
        let mut lists: Vec<ListFrame> = Vec::new();

        for block in body {
            match block.list_item.as_deref().filter(|_| block.is_text()) {
                Some(kind) => {
                    let tag = list_tag(kind);
                    let level = block.list_level();
                    while lists.len() > level {
                        close_list(&mut html, &mut lists);
                    }
                    if lists.len() == level && lists.last().map(|f| f.tag) != Some(tag) {
                        close_list(&mut html, &mut lists);
                    }
                    while lists.len() < level {
                        open_list(&mut html, &mut lists, tag);
                    }
                }
                None => {
                    while !lists.is_empty() {
                        close_list(&mut html, &mut lists);
                    }
                }
            }
            html.push_str(&self.render_block(block));
        }

        while !lists.is_empty() {
            close_list(&mut html, &mut lists);
        }
        html
    }

    /// Render a single block through its table entry
    pub fn render_block(&self, block: &Block) -> String {
        let children = if block.is_text() {
            self.render_spans(block)
        } else {
            String::new()
        };
        let renderer = self
            .blocks
            .get(block.tag())
            .copied()
            .unwrap_or(self.default_block);
        renderer(&BlockProps {
            block,
            children: &children,
            images: &self.images,
        })
    }

    fn render_spans(&self, block: &Block) -> String {
        let mut html = String::new();
        for span in &block.children {
            let mut text = html_escape(&span.text).replace('\n', "<br/>");
            for mark in &span.marks {
                let (name, def) = match block.mark_def(mark) {
                    Some(def) => (def.kind.as_str(), Some(def)),
                    None => (mark.as_str(), None),
                };
                if let Some(renderer) = self.marks.get(name) {
                    text = renderer(&text, def);
                }
            }
            html.push_str(&text);
        }
        html
    }
}

fn list_tag(kind: &str) -> &'static str {
    match kind {
        "number" => "ol",
        _ => "ul",
    }
}

/// An open `<ul>`/`<ol>`
struct ListFrame {
    tag: &'static str,
    /// The list sits inside an `<li>` that closes with it
    in_item: bool,
}

/// Open a list; a nested list goes inside the last item of its parent
fn open_list(html: &mut String, lists: &mut Vec<ListFrame>, tag: &'static str) {
    let in_item = !lists.is_empty();
    if in_item {
        if html.ends_with("</li>") {
            html.truncate(html.len() - "</li>".len());
        } else {
            html.push_str("<li>");
        }
    }
    html.push_str(&format!("<{}>", tag));
    lists.push(ListFrame { tag, in_item });
}

fn close_list(html: &mut String, lists: &mut Vec<ListFrame>) {
    if let Some(frame) = lists.pop() {
        html.push_str(&format!("</{}>", frame.tag));
        if frame.in_item {
            html.push_str("</li>");
        }
    }
}
