//! Configuration module

mod site;

pub use site::CommentsConfig;
pub use site::HighlightConfig;
pub use site::ImageConfig;
pub use site::SiteConfig;
