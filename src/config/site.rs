//! Site configuration (_config.yml)

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,
    /// Identifiers appended to every post's keyword list
    pub keywords: Vec<String>,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub posts_dir: String,
    pub public_dir: String,
    pub tag_dir: String,

    // Writing
    pub render_drafts: bool,
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub image: ImageConfig,

    // Date format (Moment.js style)
    pub date_format: String,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,

    // Feed
    pub feed_limit: usize,

    // Comments
    #[serde(default)]
    pub comments: CommentsConfig,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "hw0k.me".to_string(),
            description: String::new(),
            author: "hw0k".to_string(),
            language: "ko".to_string(),
            timezone: "Asia/Seoul".to_string(),
            keywords: vec![
                "남현욱".to_string(),
                "hw0k".to_string(),
                "기술 블로그".to_string(),
                "Tech Blog".to_string(),
            ],

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            tag_dir: "tags".to_string(),

            render_drafts: false,
            excerpt_length: 100,
            highlight: HighlightConfig::default(),
            image: ImageConfig::default(),

            date_format: "YYYY.MM.DD.".to_string(),

            per_page: 10,
            pagination_dir: "page".to_string(),

            feed_limit: 20,

            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make generation meaningless
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(anyhow!("per_page must be greater than zero"));
        }
        self.tz()?;
        crate::helpers::check_date_format(&self.date_format)?;
        Ok(())
    }

    /// Timezone used to interpret frontmatter dates
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone {:?}: {}", self.timezone, e))
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Responsive image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Widest rendition a fluid image is laid out at
    pub max_width: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { max_width: 976 }
    }
}

/// utterances comment widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    /// GitHub repository holding the comment issues, `owner/name`
    pub repo: String,
    pub issue_term: String,
    pub label: Option<String>,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            repo: String::new(),
            issue_term: "pathname".to_string(),
            label: None,
            theme: "github-light".to_string(),
        }
    }
}

impl CommentsConfig {
    /// Comments are mounted only when enabled with a repository to post to
    pub fn is_active(&self) -> bool {
        self.enable && !self.repo.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.per_page, 10);
        assert_eq!(config.excerpt_length, 100);
        assert_eq!(config.date_format, "YYYY.MM.DD.");
        assert_eq!(config.keywords.len(), 4);
        assert!(!config.comments.is_active());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
per_page: 5
keywords:
  - me
comments:
  enable: true
  repo: me/blog-comments
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.keywords, vec!["me"]);
        assert!(config.comments.is_active());
        assert_eq!(config.comments.issue_term, "pathname");
    }

    #[test]
    fn test_validate_rejects_bad_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_percent_in_date_format() {
        let config = SiteConfig {
            date_format: "YYYY.MM.DD. 100%".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_per_page() {
        let config = SiteConfig {
            per_page: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
