//! Tag labels

use crate::config::SiteConfig;
use crate::helpers::{html_escape, tag_url};

/// Identity of a tag within a list, stable across renders for the same owner
pub fn tag_key(owner: &str, tag: &str) -> String {
    format!("{}_{}", owner, tag)
}

/// A single tag label
pub fn tag(key: &str, label: &str) -> String {
    format!(
        r#"<span class="tag px-2 py-1 text-sm rounded bg-gray-100" data-key="{}">{}</span>"#,
        html_escape(key),
        html_escape(label)
    )
}

/// A tag label linking to the tag's list page
pub fn tag_link(key: &str, label: &str, href: &str) -> String {
    format!(
        r#"<a class="tag px-2 py-1 text-sm rounded bg-gray-100" data-key="{}" href="{}">{}</a>"#,
        html_escape(key),
        html_escape(href),
        html_escape(label)
    )
}

/// A row of tags keyed by `owner`; `None` when there is nothing to show
pub fn tag_row(owner: &str, tags: Option<&[String]>, class: &str) -> Option<String> {
    let tags = tags.filter(|tags| !tags.is_empty())?;
    let labels: String = tags.iter().map(|t| tag(&tag_key(owner, t), t)).collect();
    Some(format!(r#"<div class="{}">{}</div>"#, class, labels))
}

/// Like [`tag_row`], with each tag linking to its list page
///
/// Only for rows that are not already inside a link.
pub fn tag_link_row(
    config: &SiteConfig,
    owner: &str,
    tags: Option<&[String]>,
    class: &str,
) -> Option<String> {
    let tags = tags.filter(|tags| !tags.is_empty())?;
    let labels: String = tags
        .iter()
        .map(|t| {
            let key = tag_key(owner, t);
            if slug::slugify(t).is_empty() {
                tag(&key, t)
            } else {
                tag_link(&key, t, &tag_url(config, t))
            }
        })
        .collect();
    Some(format!(r#"<div class="{}">{}</div>"#, class, labels))
}
