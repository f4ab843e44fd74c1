//! Full post page

use anyhow::Result;

use super::{
    comment_anchor, fluid_image, layout, tag_link_row, CommentWidget, ComponentMap, FluidImageProps,
    LayoutProps, MetaTag, Seo, COMMENT_ANCHOR_ID, COVER_ASPECT_RATIO,
};
use crate::config::SiteConfig;
use crate::content::{FeaturedImage, MarkdownRenderer, Post};
use crate::helpers::{full_url_for, html_escape};

/// Everything the page shows about a post
#[derive(Debug, Clone, Copy)]
pub struct PostQuery<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub excerpt: &'a str,
    pub date: &'a str,
    pub tags: Option<&'a [String]>,
    pub featured_image: Option<&'a FeaturedImage>,
    /// Markdown body
    pub body: &'a str,
    /// Base URL for relative assets referenced by the body
    pub asset_base: Option<&'a str>,
}

impl<'a> From<&'a Post> for PostQuery<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            title: &post.title,
            description: post.description.as_deref(),
            excerpt: &post.excerpt,
            date: &post.date_display,
            tags: post.tags.as_deref(),
            featured_image: post.featured_image.as_ref(),
            body: &post.body,
            asset_base: Some(&post.asset_base),
        }
    }
}

/// Routing information of the page being built
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub slug: &'a str,
}

/// Keyword list of a post: its tags, its title, then the site identifiers
pub fn keywords(tags: Option<&[String]>, title: &str, site_keywords: &[String]) -> String {
    tags.unwrap_or(&[])
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(title))
        .chain(site_keywords.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders post pages
pub struct PostTemplate<'a> {
    config: &'a SiteConfig,
    renderer: &'a MarkdownRenderer,
    components: &'a ComponentMap,
    comments: Option<&'a dyn CommentWidget>,
}

impl<'a> PostTemplate<'a> {
    pub fn new(
        config: &'a SiteConfig,
        renderer: &'a MarkdownRenderer,
        components: &'a ComponentMap,
        comments: Option<&'a dyn CommentWidget>,
    ) -> Self {
        Self {
            config,
            renderer,
            components,
            comments,
        }
    }

    /// Render one complete post page
    pub fn render(&self, data: &PostQuery<'_>, page: &PageContext<'_>) -> Result<String> {
        let summary = data.description.unwrap_or(data.excerpt);
        let url = full_url_for(self.config, page.slug);

        let seo = Seo {
            title: Some(data.title),
            description: Some(summary),
            image_url: data.featured_image.map(|image| image.public_url.as_str()),
            url: Some(&url),
            meta: vec![MetaTag::new(
                "keywords",
                keywords(data.tags, data.title, &self.config.keywords),
            )],
        };

        let mut content = String::new();

        if let Some(image) = data.featured_image {
            let cover = image.fluid.with_aspect_ratio(COVER_ASPECT_RATIO);
            content.push_str(
                r#"<div class="mx-auto mb-8 md:mb-12 px-6 relative container flex flex-row justify-center rounded-lg md:rounded-xl">"#,
            );
            content.push_str(&fluid_image(&FluidImageProps {
                fluid: &cover,
                class: "w-full h-auto rounded-lg md:rounded-xl",
                alt: data.title,
                img_style: None,
            }));
            content.push_str("</div>\n");
        }

        content.push_str(r#"<div class="mx-auto mb-12 px-6 w-full max-w-screen-sm">"#);
        content.push_str(&format!(
            r#"<h1 class="mb-2 md:mb-4 text-2xl md:text-4xl leading-normal font-extrabold">{}</h1>"#,
            html_escape(data.title)
        ));
        content.push_str(&format!(
            r#"<p class="mb-2 md:mb-4 text-xl md:text-2xl leading-normal text-gray-600">{}</p>"#,
            html_escape(summary)
        ));
        if let Some(row) = tag_link_row(
            self.config,
            page.slug,
            data.tags,
            "mt-2 mb-2 flex flex-row space-x-2",
        ) {
            content.push_str(&row);
        }
        content.push_str(&format!(
            r#"<small class="text-sm md:text-base">{}</small>"#,
            html_escape(data.date)
        ));
        content.push_str("</div>\n");

        let body = self
            .renderer
            .render_document(data.body, data.asset_base, self.components)?;
        content.push_str(
            r#"<article class="mx-auto mb-12 px-6 prose md:prose-lg w-full max-w-screen-sm">"#,
        );
        content.push_str(&body);
        content.push_str("</article>\n");

        let scripts = match self.comments {
            Some(widget) => {
                content.push_str(r#"<div class="mx-auto px-6 container">"#);
                content.push_str(&comment_anchor());
                content.push_str("</div>");
                widget.mount_script(COMMENT_ANCHOR_ID)
            }
            None => String::new(),
        };

        Ok(layout(
            self.config,
            &LayoutProps {
                seo: &seo,
                content: &content,
                scripts: &scripts,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Element, Utterances};
    use crate::config::CommentsConfig;
    use crate::content::FluidImage;

    fn query<'a>(tags: Option<&'a [String]>) -> PostQuery<'a> {
        PostQuery {
            title: "Hello",
            description: None,
            excerpt: "An intro...",
            date: "2021.01.01.",
            tags,
            featured_image: None,
            body: "# Section\n\nBody text.",
            asset_base: Some("/posts/"),
        }
    }

    fn render(data: &PostQuery<'_>, comments: Option<&dyn CommentWidget>) -> String {
        let config = SiteConfig {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        let renderer = MarkdownRenderer::new();
        let components = ComponentMap::new();
        PostTemplate::new(&config, &renderer, &components, comments)
            .render(data, &PageContext { slug: "/posts/hello/" })
            .unwrap()
    }

    #[test]
    fn test_keywords() {
        let tags = vec!["go".to_string(), "rust".to_string()];
        let site = vec!["hw0k".to_string(), "Tech Blog".to_string()];
        assert_eq!(keywords(Some(&tags), "Hello", &site), "go,rust,Hello,hw0k,Tech Blog");
        assert_eq!(keywords(None, "Hello", &site), "Hello,hw0k,Tech Blog");
    }

    #[test]
    fn test_page_without_optional_fields() {
        let html = render(&query(None), None);
        assert!(html.contains("<title>Hello | hw0k.me</title>"));
        assert!(html.contains(r#"leading-normal font-extrabold">Hello</h1>"#));
        assert!(html.contains(r#"text-gray-600">An intro...</p>"#));
        assert!(html.contains(r#"<meta name="description" content="An intro...">"#));
        assert!(html.contains(
            r#"<meta name="keywords" content="Hello,남현욱,hw0k,기술 블로그,Tech Blog">"#
        ));
        assert!(html.contains("<h1>Section</h1>"));
        assert!(html.contains("<p>Body text.</p>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("data-key"));
        assert!(!html.contains(r#"id="utterances""#));
        assert!(!html.contains("og:image"));
    }

    #[test]
    fn test_page_with_everything() {
        let tags = vec!["go".to_string(), "rust".to_string()];
        let image = FeaturedImage {
            fluid: FluidImage::from_dimensions("/posts/hello/cover.png", 1200, 800, 976),
            public_url: "https://example.com/posts/hello/cover.png".to_string(),
        };
        let data = PostQuery {
            description: Some("Described"),
            featured_image: Some(&image),
            ..query(Some(&tags))
        };
        let comments = CommentsConfig {
            enable: true,
            repo: "hw0k/comments".to_string(),
            ..Default::default()
        };
        let widget = Utterances::from_config(&comments).unwrap();
        let html = render(&data, Some(&widget));

        assert!(html.contains(r#"text-gray-600">Described</p>"#));
        assert!(!html.contains("An intro..."));
        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains(&format!(r#"data-aspect-ratio="{}""#, COVER_ASPECT_RATIO)));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://example.com/posts/hello/cover.png">"#
        ));
        assert!(html.contains(r#"data-key="/posts/hello/_go""#));
        assert!(html.contains(r#"data-key="/posts/hello/_rust" href="/tags/rust/">rust</a>"#));
        assert!(html.contains(r#"<meta name="keywords" content="go,rust,Hello,"#));
        assert!(html.contains(r#"<div id="utterances"></div>"#));
        assert!(html.contains(r#"script.setAttribute("repo", "hw0k/comments");"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/posts/hello/">"#));
    }

    #[test]
    fn test_body_goes_through_components() {
        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new();
        let components = ComponentMap::new().with("img", |el| match el {
            Element::Image { src, .. } => Some(format!("<x-img src=\"{}\"></x-img>", src)),
            _ => None,
        });
        let data = PostQuery {
            body: "![diagram](diagram.png)",
            ..query(None)
        };
        let html = PostTemplate::new(&config, &renderer, &components, None)
            .render(&data, &PageContext { slug: "/posts/hello/" })
            .unwrap();
        assert!(html.contains(r#"<x-img src="/posts/diagram.png"></x-img>"#));
    }
}
