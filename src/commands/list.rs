//! List site content

use anyhow::Result;

use crate::helpers::{post_path, short_date};
use crate::store::ContentStore;
use crate::Quill;

/// List site content by type
pub async fn run(quill: &Quill, store: &dyn ContentStore, content_type: &str) -> Result<()> {
    for line in lines(quill, store, content_type).await? {
        println!("{}", line);
    }
    Ok(())
}

async fn lines(quill: &Quill, store: &dyn ContentStore, content_type: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    match content_type {
        "post" | "posts" => {
            let posts = store.fetch_posts().await?;
            out.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                let date = post
                    .created_at
                    .as_ref()
                    .map(short_date)
                    .unwrap_or_else(|| "----------".to_string());
                out.push(format!(
                    "  {} - {} [{}]",
                    date,
                    post.title,
                    post_path(&quill.config, &post.slug.current)
                ));
            }
        }
        "route" | "routes" => {
            let slugs = store.fetch_slugs().await?;
            out.push(format!("Routes ({}):", slugs.len() + 1));
            out.push("  /".to_string());
            for slug in slugs {
                out.push(format!("  {}", post_path(&quill.config, &slug)));
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    }
    Ok(out)
}
