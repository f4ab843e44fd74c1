//! Post list pages (home page and tag pages)

use super::{layout, post_item, LayoutProps, PostItemProps, Seo};
use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{full_url_for, html_escape};

/// Position of a list page among its siblings
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
    pub current_url: String,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

pub struct PostListProps<'a> {
    /// Shown above the list and used as the page title
    pub heading: Option<&'a str>,
    pub posts: &'a [&'a Post],
    pub pagination: Option<&'a Pagination>,
}

pub fn post_list_page(config: &SiteConfig, props: &PostListProps<'_>) -> String {
    let mut content = String::from(r#"<div class="mx-auto px-6 w-full max-w-screen-md">"#);

    if let Some(heading) = props.heading {
        content.push_str(&format!(
            r#"<h2 class="mb-8 text-2xl md:text-3xl font-extrabold">{}</h2>"#,
            html_escape(heading)
        ));
    }

    content.push_str(r#"<div class="flex flex-col space-y-12">"#);
    for post in props.posts {
        content.push_str(&post_item(&PostItemProps::from(*post)));
    }
    content.push_str("</div>");

    if let Some(pagination) = props.pagination.filter(|p| p.total > 1) {
        content.push_str(&pager(pagination));
    }
    content.push_str("</div>");

    let url = props
        .pagination
        .map(|p| full_url_for(config, &p.current_url));
    let seo = Seo {
        title: props.heading,
        url: url.as_deref(),
        ..Default::default()
    };

    layout(
        config,
        &LayoutProps {
            seo: &seo,
            content: &content,
            scripts: "",
        },
    )
}

fn pager(pagination: &Pagination) -> String {
    let mut nav = String::from(r#"<nav class="mt-12 flex flex-row justify-between text-sm">"#);
    match &pagination.prev_link {
        Some(link) => nav.push_str(&format!(
            r#"<a class="prev" href="{}">← Newer</a>"#,
            html_escape(link)
        )),
        None => nav.push_str("<span></span>"),
    }
    nav.push_str(&format!(
        r#"<span class="page-number">{} / {}</span>"#,
        pagination.current, pagination.total
    ));
    match &pagination.next_link {
        Some(link) => nav.push_str(&format!(
            r#"<a class="next" href="{}">Older →</a>"#,
            html_escape(link)
        )),
        None => nav.push_str("<span></span>"),
    }
    nav.push_str("</nav>");
    nav
}
