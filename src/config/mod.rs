//! Configuration module

mod site;

pub use site::SanityConfig;
pub use site::SiteConfig;
pub use site::TOKEN_ENV;
