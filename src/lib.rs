//! quill: a server-rendered blog over a Sanity content lake
//!
//! Posts and approved comments are fetched with GROQ and rendered to HTML
//! on each request; reader comments are written back as unapproved
//! documents for moderation.

pub mod commands;
pub mod comments;
pub mod config;
pub mod content;
pub mod helpers;
pub mod render;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use store::{ContentStore, MemoryStore, SanityClient};

/// The main application
#[derive(Debug, Clone)]
pub struct Quill {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Quill {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self { config, base_dir })
    }

    /// Connect to the configured Sanity project
    pub fn connect(&self) -> Result<Arc<dyn ContentStore>> {
        let client = SanityClient::new(self.config.sanity.clone())?;
        Ok(Arc::new(client))
    }

    /// Serve documents from a dataset export instead of a live project
    pub fn open_fixture<P: AsRef<Path>>(&self, path: P) -> Result<Arc<dyn ContentStore>> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        Ok(Arc::new(MemoryStore::from_file(path)?))
    }

    /// Start the HTTP server
    pub async fn serve(&self, store: Arc<dyn ContentStore>, ip: &str, port: u16) -> Result<()> {
        server::start(self.config.clone(), store, ip, port).await
    }

    /// List site content
    pub async fn list(&self, store: &dyn ContentStore, content_type: &str) -> Result<()> {
        commands::list::run(self, store, content_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let quill = Quill::new(dir.path()).unwrap();
        assert_eq!(quill.config.title, "Medium Blog");
        assert!(quill.connect().is_err());
    }

    #[test]
    fn test_new_reads_config_and_connects() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Field Notes\nsanity:\n  project_id: abc123\n",
        )
        .unwrap();

        let quill = Quill::new(dir.path()).unwrap();
        assert_eq!(quill.config.title, "Field Notes");
        assert!(quill.connect().is_ok());
    }

    #[tokio::test]
    async fn test_open_fixture_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("data.json"),
            r#"[{"_id":"p1","_type":"post","title":"Hello","slug":{"current":"hello"}}]"#,
        )
        .unwrap();

        let quill = Quill::new(dir.path()).unwrap();
        let store = quill.open_fixture("data.json").unwrap();
        assert_eq!(store.fetch_slugs().await.unwrap(), vec!["hello"]);
    }
}
