//! Page shell shared by every generated page

use chrono::{Datelike, Utc};

use super::Seo;
use crate::config::SiteConfig;
use crate::helpers::{html_escape, url_for};

pub struct LayoutProps<'a> {
    pub seo: &'a Seo<'a>,
    pub content: &'a str,
    /// Scripts placed right before `</body>`
    pub scripts: &'a str,
}

pub fn layout(config: &SiteConfig, props: &LayoutProps<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="generator" content="mdx-blog {version}">
{head}
<link rel="alternate" type="application/atom+xml" title="{title}" href="{feed}">
</head>
<body>
<header class="mx-auto mb-8 px-6 py-6 container flex flex-row items-center justify-between">
<a class="text-xl font-bold" href="{home}">{title}</a>
</header>
<main>
{content}
</main>
<footer class="mx-auto mt-12 px-6 py-8 container text-sm text-gray-500">
<small>© {year} {author}</small>
</footer>
{scripts}
</body>
</html>
"#,
        lang = html_escape(&config.language),
        version = env!("CARGO_PKG_VERSION"),
        head = props.seo.render(config),
        title = html_escape(&config.title),
        feed = url_for(config, "atom.xml"),
        home = url_for(config, "/"),
        content = props.content,
        year = Utc::now().year(),
        author = html_escape(&config.author),
        scripts = props.scripts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_wraps_content() {
        let config = SiteConfig::default();
        let seo = Seo {
            title: Some("Hello"),
            ..Default::default()
        };
        let html = layout(
            &config,
            &LayoutProps {
                seo: &seo,
                content: "<p>body</p>",
                scripts: "<script>1</script>",
            },
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="ko">"#));
        assert!(html.contains("<title>Hello | hw0k.me</title>"));
        assert!(html.contains("<main>\n<p>body</p>\n</main>"));
        assert!(html.contains("<script>1</script>\n</body>"));
        assert!(html.contains(r#"href="/atom.xml""#));
    }
}
