//! Image asset URLs on the Sanity CDN

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SanityConfig;
use crate::content::ImageRef;

lazy_static! {
    /// `image-<asset id>-<width>x<height>-<format>`
    static ref IMAGE_REF: Regex =
        Regex::new(r"^image-([A-Za-z0-9]+)-(\d+x\d+)-([a-z0-9]+)$").unwrap();
}

/// Builds CDN URLs for image references of one project and dataset
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(config: &SanityConfig) -> Self {
        Self {
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
        }
    }

    /// URL for an asset reference id, `None` if it is not an image asset id
    pub fn asset_url(&self, asset_ref: &str) -> Option<String> {
        let caps = IMAGE_REF.captures(asset_ref)?;
        Some(format!(
            "https://cdn.sanity.io/images/{}/{}/{}-{}.{}",
            self.project_id, self.dataset, &caps[1], &caps[2], &caps[3]
        ))
    }

    /// URL for an image field
    pub fn url(&self, image: Option<&ImageRef>) -> Option<String> {
        let asset = image?.asset.as_ref()?;
        self.asset_url(&asset.target)
    }
}
