//! Content module - loads posts and turns them into render-ready data

mod error;
mod frontmatter;
mod image;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use image::{FeaturedImage, FluidImage, ImageSource};
pub use markdown::MarkdownRenderer;
pub use post::Post;
