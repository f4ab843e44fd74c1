//! Summary block of one post in a list

use super::{fluid_image, tag_row, FluidImageProps, COVER_ASPECT_RATIO};
use crate::content::{FluidImage, Post};
use crate::helpers::html_escape;

const THUMBNAIL_IMG_STYLE: &str =
    "transition:transform 150ms cubic-bezier(0.4, 0, 0.2, 1), opacity 500ms ease 0s";

#[derive(Debug, Clone, Copy)]
pub struct PostItemProps<'a> {
    /// Link target; the site root when `None`
    pub to: Option<&'a str>,
    pub thumbnail_fluid: Option<&'a FluidImage>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub tags: Option<&'a [String]>,
    pub date: &'a str,
    pub excerpt: &'a str,
}

impl<'a> From<&'a Post> for PostItemProps<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            to: Some(&post.slug),
            thumbnail_fluid: post.featured_image.as_ref().map(|image| &image.fluid),
            title: &post.title,
            description: post.description.as_deref(),
            tags: post.tags.as_deref(),
            date: &post.date_display,
            excerpt: &post.excerpt,
        }
    }
}

/// One clickable post summary
pub fn post_item(props: &PostItemProps<'_>) -> String {
    let to = props.to.unwrap_or("/");
    let mut html = format!(r#"<a class="post-item" href="{}">"#, html_escape(to));

    if let Some(fluid) = props.thumbnail_fluid {
        let cover = fluid.with_aspect_ratio(COVER_ASPECT_RATIO);
        html.push_str(r#"<div class="mb-4 w-full h-auto relative rounded-lg overflow-hidden">"#);
        html.push_str(r#"<div class="overlay"></div>"#);
        html.push_str(&fluid_image(&FluidImageProps {
            fluid: &cover,
            class: "w-full h-auto object-cover rounded-lg",
            alt: "thumbnail",
            img_style: Some(THUMBNAIL_IMG_STYLE),
        }));
        html.push_str("</div>");
    }

    html.push_str(&format!(
        r#"<h3 class="mb-2 text-xl md:text-2xl font-bold">{}</h3>"#,
        html_escape(props.title)
    ));
    html.push_str(&format!(
        r#"<p class="mb-2">{}</p>"#,
        html_escape(props.description.unwrap_or(props.excerpt))
    ));
    if let Some(row) = tag_row(to, props.tags, "mt-4 mb-2 flex flex-row space-x-2") {
        html.push_str(&row);
    }
    html.push_str(&format!(
        r#"<small class="text-sm text-gray-500">{}</small>"#,
        html_escape(props.date)
    ));
    html.push_str("</a>");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_tags() -> Vec<String> {
        vec!["go".to_string(), "rust".to_string()]
    }

    fn hello<'a>(tags: &'a [String]) -> PostItemProps<'a> {
        PostItemProps {
            to: Some("/posts/hello"),
            thumbnail_fluid: None,
            title: "Hello",
            description: None,
            tags: Some(tags),
            date: "2021.01.01.",
            excerpt: "An intro...",
        }
    }

    #[test]
    fn test_summary_without_description_shows_excerpt() {
        let tags = hello_tags();
        let html = post_item(&hello(&tags));
        assert!(html.starts_with(r#"<a class="post-item" href="/posts/hello">"#));
        assert!(html.contains(r#"<p class="mb-2">An intro...</p>"#));
        assert_eq!(html.matches(r#"<span class="tag"#).count(), 2);
        assert!(html.contains(r#"data-key="/posts/hello_go">go</span>"#));
        assert!(html.contains(r#"data-key="/posts/hello_rust">rust</span>"#));
        assert!(html.contains("<small class=\"text-sm text-gray-500\">2021.01.01.</small>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_description_wins_even_when_empty() {
        let tags = hello_tags();
        let described = post_item(&PostItemProps {
            description: Some("Described"),
            ..hello(&tags)
        });
        assert!(described.contains(r#"<p class="mb-2">Described</p>"#));
        assert!(!described.contains("An intro..."));

        let empty = post_item(&PostItemProps {
            description: Some(""),
            ..hello(&tags)
        });
        assert!(empty.contains(r#"<p class="mb-2"></p>"#));
        assert!(!empty.contains("An intro..."));
    }

    #[test]
    fn test_missing_link_target_points_to_root() {
        let tags = hello_tags();
        let html = post_item(&PostItemProps {
            to: None,
            ..hello(&tags)
        });
        assert!(html.starts_with(r#"<a class="post-item" href="/">"#));
        assert!(html.contains(r#"data-key="/_go""#));
    }

    #[test]
    fn test_thumbnail_is_forced_wide() {
        let tags = hello_tags();
        let square = FluidImage::from_dimensions("/posts/hello/cover.png", 600, 600, 976);
        let html = post_item(&PostItemProps {
            thumbnail_fluid: Some(&square),
            ..hello(&tags)
        });
        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains(r#"<div class="overlay"></div>"#));
        assert!(html.contains(&format!(
            r#"data-aspect-ratio="{}""#,
            COVER_ASPECT_RATIO
        )));
        assert!(html.contains(&format!("padding-bottom:{}%", 100.0 / COVER_ASPECT_RATIO)));
        assert!(html.contains(r#"alt="thumbnail""#));
    }

    #[test]
    fn test_no_tag_row_without_tags() {
        let html = post_item(&PostItemProps {
            tags: None,
            ..hello(&[])
        });
        assert!(!html.contains("space-x-2"));
    }
}
