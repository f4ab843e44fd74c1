//! Create a new post

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::helpers::format_date;
use crate::Blog;

/// Scaffold `<posts_dir>/<slug>/index.md(x)` and return its path
pub fn create_post(blog: &Blog, title: &str, mdx: bool) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = blog
        .content_dir
        .join(&blog.config.posts_dir)
        .join(&slug);
    let file_path = target_dir.join(if mdx { "index.mdx" } else { "index.md" });

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = Utc::now().with_timezone(&blog.config.tz()?);
    let content = format!(
        r#"---
title: {title}
description:
date: {date}
tags: []
# featuredImage: ./cover.png
---
"#,
        title = serde_yaml::to_string(title)?.trim_end(),
        date = format_date(&now, "YYYY-MM-DD HH:mm:ss"),
    );

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_post_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), Default::default());

        let path = create_post(&blog, "Hello: World", false).unwrap();
        assert!(path.ends_with("content/posts/hello-world/index.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello: World"));
        assert_eq!(fm.description, None);
        assert_eq!(fm.tags, Some(Vec::new()));
        assert!(fm.parse_date(chrono_tz::Asia::Seoul).unwrap().is_some());

        assert!(create_post(&blog, "Hello: World", false).is_err());
    }
}
