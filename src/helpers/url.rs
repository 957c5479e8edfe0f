//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped in a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/post/hello") // -> "/blog/post/hello"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Path of a post's detail page
///
/// # Examples
/// ```ignore
/// post_path(&config, "hello") // -> "/post/hello"
/// ```
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("post/{}", encode_segment(slug)))
}

/// Absolute URL of a post's detail page
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    full_url_for(config, &format!("post/{}", encode_segment(slug)))
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/post/hello"), "/blog/post/hello");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/post/hello"),
            "https://example.com/blog/post/hello"
        );
    }

    #[test]
    fn test_post_url() {
        let config = test_config();
        assert_eq!(
            post_url(&config, "hello"),
            "https://example.com/blog/post/hello"
        );
    }

    #[test]
    fn test_post_path_default_root() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "hello"), "/post/hello");
        assert_eq!(post_path(&config, "my-first_post"), "/post/my-first_post");
    }

    #[test]
    fn test_post_path_escapes_segment() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "a b/c"), "/post/a%20b%2Fc");
    }
}
