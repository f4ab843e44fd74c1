//! Content loader - loads posts from the content directory

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

use super::{ContentError, FeaturedImage, FluidImage, FrontMatter, MarkdownRenderer, Post};
use crate::helpers::{format_date, full_url_for, url_for};
use crate::Blog;

/// Loads posts from `<content_dir>/<posts_dir>`
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    tz: Tz,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let tz = blog.config.tz()?;
        Ok(Self { blog, tz })
    }

    /// Load every publishable post, newest first
    ///
    /// Posts that fail to load are logged and skipped.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.blog.content_dir.join(&self.blog.config.posts_dir);
        if !posts_dir.exists() {
            tracing::warn!("Posts directory {:?} does not exist", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_post_file(path) {
                continue;
            }
            match self.load_post(path) {
                Ok(post) if post.draft && !self.blog.config.render_drafts => {
                    tracing::debug!("Skipping draft {:?}", path);
                }
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let body = if is_mdx(path) {
            MarkdownRenderer::strip_mdx_esm(body)
        } else {
            body.to_string()
        };

        let date = match fm.parse_date(self.tz)? {
            Some(date) => date,
            None => file_modified(path)
                .unwrap_or_else(Utc::now)
                .with_timezone(&self.tz),
        };

        let relative = path.strip_prefix(&self.blog.content_dir).unwrap_or(path);
        let source = url_segments(relative).join("/");
        let slug = slug_for(relative);
        let asset_base = url_for(
            &self.blog.config,
            &format!("{}/", url_segments(relative.parent().unwrap_or(Path::new(""))).join("/")),
        );

        let title = fm.title.clone().unwrap_or_else(|| fallback_title(relative));

        let featured_image = fm
            .featured_image
            .as_deref()
            .and_then(|image| self.resolve_featured_image(path, image));

        let config = &self.blog.config;
        Ok(Post {
            title,
            description: fm.description,
            date_display: format_date(&date, &config.date_format),
            date,
            tags: fm.tags,
            excerpt: MarkdownRenderer::excerpt(&body, config.excerpt_length),
            body,
            featured_image,
            slug: url_for(config, &slug),
            asset_base,
            source,
            full_source: path.to_path_buf(),
            draft: fm.draft,
            extra: fm.extra,
        })
    }

    /// Describe a hero image referenced from a post's frontmatter
    fn resolve_featured_image(&self, post_path: &Path, image: &str) -> Option<FeaturedImage> {
        let file = match image.strip_prefix('/') {
            Some(rooted) => self.blog.content_dir.join(rooted),
            None => post_path.parent().unwrap_or(Path::new("")).join(image),
        };

        if !file.is_file() {
            tracing::warn!(
                "Featured image {:?} of {:?} not found, rendering without it",
                image,
                post_path
            );
            return None;
        }

        let relative = file.strip_prefix(&self.blog.content_dir).ok()?;
        let path = url_segments(relative).join("/");
        let config = &self.blog.config;

        Some(FeaturedImage {
            fluid: FluidImage::from_file(&file, &url_for(config, &path), config.image.max_width),
            public_url: full_url_for(config, &path),
        })
    }
}

/// URL path of a post: its path under the content directory without the
/// extension, with `index` files standing for their folder
fn slug_for(relative: &Path) -> String {
    let mut segments = url_segments(relative.parent().unwrap_or(Path::new("")));
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    if stem != "index" {
        segments.push(stem.to_string());
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

fn fallback_title(relative: &Path) -> String {
    let stem = relative.file_stem().and_then(|s| s.to_str());
    match stem {
        Some("index") => relative
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string(),
        Some(stem) => stem.to_string(),
        None => "Untitled".to_string(),
    }
}

fn url_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

fn file_modified(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Check if a file is a markdown or MDX document
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}

fn is_mdx(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("mdx")
}
