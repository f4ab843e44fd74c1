//! Post model

use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::path::PathBuf;

use super::FeaturedImage;

/// A blog post, fully materialized before anything is rendered
#[derive(Debug, Clone)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Author-written summary; `Some("")` is a deliberate empty description
    pub description: Option<String>,

    /// Publication date
    pub date: DateTime<Tz>,

    /// Publication date in the site's display format
    pub date_display: String,

    /// Tags in frontmatter order
    pub tags: Option<Vec<String>>,

    /// Plain-text preview of the body
    pub excerpt: String,

    /// Markdown body, rendered when the post page is built
    pub body: String,

    /// Hero image
    pub featured_image: Option<FeaturedImage>,

    /// URL path of the post page, e.g. `/posts/hello/`
    pub slug: String,

    /// URL of the directory holding the source file, for relative assets
    pub asset_base: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Drafts are only built with `render_drafts`
    pub draft: bool,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Text shown under the title: the description, or the excerpt without one
    pub fn summary(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.excerpt)
    }

    /// Tags, empty when the post has none
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}
