//! Document metadata for the page head

use crate::config::SiteConfig;
use crate::helpers::html_escape;

/// An extra `<meta name=... content=...>` entry
#[derive(Debug, Clone, PartialEq)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

impl MetaTag {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Head metadata of one page
#[derive(Debug, Clone, Default)]
pub struct Seo<'a> {
    /// Page title; the site title alone when `None`
    pub title: Option<&'a str>,
    /// Falls back to the site description when `None`
    pub description: Option<&'a str>,
    /// Absolute URL of the social preview image
    pub image_url: Option<&'a str>,
    /// Absolute URL of the page
    pub url: Option<&'a str>,
    pub meta: Vec<MetaTag>,
}

impl Seo<'_> {
    /// Render the `<title>` and `<meta>` tags
    pub fn render(&self, config: &SiteConfig) -> String {
        let title = match self.title {
            Some(title) => format!("{} | {}", title, config.title),
            None => config.title.clone(),
        };
        let description = self.description.unwrap_or(&config.description);
        let og_type = if self.title.is_some() { "article" } else { "website" };

        let mut tags = vec![
            format!("<title>{}</title>", html_escape(&title)),
            meta_name("description", description),
            meta_property("og:title", &title),
            meta_property("og:description", description),
            meta_property("og:type", og_type),
            meta_property("og:site_name", &config.title),
            meta_name(
                "twitter:card",
                if self.image_url.is_some() {
                    "summary_large_image"
                } else {
                    "summary"
                },
            ),
            meta_name("twitter:creator", &config.author),
            meta_name("twitter:title", &title),
            meta_name("twitter:description", description),
        ];

        if let Some(url) = self.url {
            tags.push(meta_property("og:url", url));
            tags.push(format!(r#"<link rel="canonical" href="{}">"#, html_escape(url)));
        }

        if let Some(image) = self.image_url {
            tags.push(meta_property("og:image", image));
            tags.push(meta_name("twitter:image", image));
        }

        tags.extend(self.meta.iter().map(|m| meta_name(&m.name, &m.content)));

        tags.join("\n")
    }
}

fn meta_name(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        html_escape(name),
        html_escape(content)
    )
}

fn meta_property(property: &str, content: &str) -> String {
    format!(
        r#"<meta property="{}" content="{}">"#,
        html_escape(property),
        html_escape(content)
    )
}
