//! Generator module - writes the static site

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::components::{
    post_list_page, CommentWidget, ComponentMap, PageContext, Pagination, PostListProps, PostQuery,
    PostTemplate, Utterances,
};
use crate::content::loader::is_post_file;
use crate::content::{MarkdownRenderer, Post};
use crate::helpers::{date_xml, full_url_for, html_escape, tag_url, url_for};
use crate::Blog;

/// Static site generator
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    components: ComponentMap,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Self {
        let highlight = &blog.config.highlight;
        Self {
            blog,
            renderer: MarkdownRenderer::with_options(
                &highlight.theme,
                highlight.enable,
                highlight.line_number,
            ),
            components: ComponentMap::new(),
        }
    }

    /// Render post bodies through `components`
    pub fn with_components(mut self, components: ComponentMap) -> Self {
        self.components = components;
        self
    }

    /// Generate the entire site from posts sorted newest first
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        self.copy_content_assets()?;
        self.generate_index_pages(posts)?;
        self.generate_post_pages(posts)?;
        self.generate_tag_pages(posts)?;
        self.generate_atom_feed(posts)?;
        self.generate_search_index(posts)?;

        Ok(())
    }

    /// Generate the post list, `per_page` posts per page
    fn generate_index_pages(&self, posts: &[Post]) -> Result<()> {
        let per_page = self.blog.config.per_page.max(1);
        let total_pages = posts.len().div_ceil(per_page).max(1);
        let all: Vec<&Post> = posts.iter().collect();

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(all.len());
            let pagination = self.pagination(page_num, total_pages);

            let html = post_list_page(
                &self.blog.config,
                &PostListProps {
                    heading: None,
                    posts: &all[start..end],
                    pagination: Some(&pagination),
                },
            );
            self.write_page(&pagination.current_url, &html)?;
        }

        tracing::info!("Generated {} index page(s)", total_pages);
        Ok(())
    }

    /// Links of list page `page_num` (1-based) out of `total`
    fn pagination(&self, page_num: usize, total: usize) -> Pagination {
        let config = &self.blog.config;
        let page_url = |n: usize| {
            if n == 1 {
                url_for(config, "/")
            } else {
                url_for(config, &format!("{}/{}/", config.pagination_dir, n))
            }
        };

        Pagination {
            current: page_num,
            total,
            current_url: page_url(page_num),
            prev_link: (page_num > 1).then(|| page_url(page_num - 1)),
            next_link: (page_num < total).then(|| page_url(page_num + 1)),
        }
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post]) -> Result<()> {
        let utterances = Utterances::from_config(&self.blog.config.comments);
        let comments = utterances.as_ref().map(|w| w as &dyn CommentWidget);
        let template = PostTemplate::new(
            &self.blog.config,
            &self.renderer,
            &self.components,
            comments,
        );

        for post in posts {
            let html = template
                .render(&PostQuery::from(post), &PageContext { slug: &post.slug })
                .with_context(|| format!("Failed to render {}", post.source))?;
            let output = self.write_page(&post.slug, &html)?;
            tracing::debug!("Generated post: {:?}", output);
        }

        tracing::info!("Generated {} post page(s)", posts.len());
        Ok(())
    }

    /// Generate one list page per tag
    fn generate_tag_pages(&self, posts: &[Post]) -> Result<()> {
        let tags = group_by_tag(posts);

        for group in tags.values() {
            let heading = format!("#{}", group.name);
            let html = post_list_page(
                &self.blog.config,
                &PostListProps {
                    heading: Some(&heading),
                    posts: &group.posts,
                    pagination: None,
                },
            );
            self.write_page(&tag_url(&self.blog.config, &group.name), &html)?;
        }

        tracing::info!("Generated {} tag page(s)", tags.len());
        Ok(())
    }

    /// Generate Atom feed
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.blog.config;
        let home = full_url_for(config, "/");

        let mut feed = String::new();
        feed.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        feed.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
        feed.push_str(&format!("  <title>{}</title>\n", html_escape(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            full_url_for(config, "atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", home));
        if let Some(latest) = posts.first() {
            feed.push_str(&format!("  <updated>{}</updated>\n", date_xml(&latest.date)));
        }
        feed.push_str(&format!("  <id>{}</id>\n", home));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            html_escape(&config.author)
        ));

        for post in posts.iter().take(config.feed_limit) {
            let link = full_url_for(config, &post.slug);
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", html_escape(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                date_xml(&post.date)
            ));
            feed.push_str(&format!("    <updated>{}</updated>\n", date_xml(&post.date)));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                html_escape(post.summary())
            ));
            for tag in post.tag_list() {
                feed.push_str(&format!("    <category term=\"{}\"/>\n", html_escape(tag)));
            }
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.blog.public_dir.join("atom.xml");
        fs::write(&output_path, feed)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, posts: &[Post]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.title,
                    "url": p.slug,
                    "description": p.summary(),
                    "tags": p.tag_list(),
                    "date": p.date_display,
                })
            })
            .collect();

        let output_path = self.blog.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Copy images and other files living next to the posts
    fn copy_content_assets(&self) -> Result<()> {
        let content_dir = &self.blog.content_dir;
        if !content_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || is_post_file(path) {
                continue;
            }

            let relative = path.strip_prefix(content_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            copied += 1;
        }

        tracing::debug!("Copied {} asset(s)", copied);
        Ok(())
    }

    /// Write `html` as the index file of the URL path `url_path`
    fn write_page(&self, url_path: &str, html: &str) -> Result<PathBuf> {
        let output_path = self
            .blog
            .public_dir
            .join(strip_root(&self.blog.config.root, url_path))
            .join("index.html");

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;

        Ok(output_path)
    }
}

/// Posts sharing one tag page
#[derive(Debug)]
pub struct TagGroup<'a> {
    /// Spelling of the tag as first seen
    pub name: String,
    pub posts: Vec<&'a Post>,
}

/// Posts grouped by tag slug, tags in alphabetical order, posts in input order
///
/// Tags whose slugs collide (`Rust` and `rust`) share one group.
pub fn group_by_tag(posts: &[Post]) -> IndexMap<String, TagGroup<'_>> {
    let mut tags: IndexMap<String, TagGroup<'_>> = IndexMap::new();

    for post in posts {
        for tag in post.tag_list() {
            let tag_slug = slug::slugify(tag);
            if tag_slug.is_empty() {
                tracing::warn!("Tag {:?} has no usable slug, skipping its page", tag);
                continue;
            }

            let group = tags.entry(tag_slug).or_insert_with(|| TagGroup {
                name: tag.clone(),
                posts: Vec::new(),
            });
            if group.name != *tag {
                tracing::debug!("Tag {:?} merged into {:?}", tag, group.name);
            }
            if !group.posts.iter().any(|p| std::ptr::eq(*p, post)) {
                group.posts.push(post);
            }
        }
    }

    tags.sort_keys();
    tags
}

/// Output directory of a URL path, relative to the public directory
fn strip_root<'p>(root: &str, url_path: &'p str) -> &'p str {
    let root = root.trim_matches('/');
    let path = url_path.trim_matches('/');
    if root.is_empty() {
        return path;
    }
    match path.strip_prefix(root) {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => path,
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}
