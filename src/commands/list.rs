//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::generator::group_by_tag;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let posts = ContentLoader::new(blog)?.load_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} [{}]{}",
                    post.date_display,
                    post.title,
                    post.source,
                    if post.draft { " (draft)" } else { "" }
                );
            }
        }
        "tag" | "tags" => {
            let tags = group_by_tag(&posts);
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.values().map(|g| (&g.name, g.posts.len())).collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "route" | "routes" => {
            println!("Routes ({}):", posts.len());
            for post in &posts {
                println!("  {}", post.slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, route",
                content_type
            );
        }
    }

    Ok(())
}
