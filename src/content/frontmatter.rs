//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::ContentError;

/// Accepts a single string, a list of strings, or null
fn opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value.to_string()]))
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(Some(vec))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// `description: ""` is kept as an empty description, `description:` is absent
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "opt_string_or_vec", default)]
    pub tags: Option<Vec<String>>,
    /// Path of the hero image, relative to the post file
    #[serde(rename = "featuredImage", alias = "featured_image")]
    pub featured_image: Option<String>,
    pub draft: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };
        // The opening fence must stand on its own line
        if !(rest.starts_with('\n') || rest.starts_with("\r\n")) {
            return Ok((FrontMatter::default(), content));
        }
        let rest = rest.trim_start_matches(['\n', '\r']);

        let (yaml, remaining) = match rest.find("\n---") {
            Some(end_pos) => {
                let after = &rest[end_pos + 4..];
                (&rest[..end_pos], after.trim_start_matches(['\n', '\r']))
            }
            None if looks_like_yaml(rest) => return Err(ContentError::UnterminatedFrontmatter),
            None => return Ok((FrontMatter::default(), content)),
        };

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A leading thematic break followed by prose is not front-matter
        if !looks_like_yaml(yaml) {
            return Ok((FrontMatter::default(), content));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, remaining))
    }

    /// Parse the date string in the site's timezone
    pub fn parse_date(&self, tz: Tz) -> Result<Option<DateTime<Tz>>, ContentError> {
        match self.date.as_deref() {
            None => Ok(None),
            Some(s) => parse_date_string(s, tz)
                .map(Some)
                .ok_or_else(|| ContentError::InvalidDate(s.to_string())),
        }
    }
}

/// The first meaningful line must look like `key: value`
fn looks_like_yaml(block: &str) -> bool {
    block
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .and_then(|line| line.split_once(':'))
        .map(|(key, value)| {
            !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                && (value.is_empty() || value.starts_with(' '))
        })
        .unwrap_or(false)
}

/// Parse a date string in various formats
fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&tz));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
description: A first post
date: 2021-01-01
featuredImage: ./cover.png
tags:
  - go
  - rust
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.description.as_deref(), Some("A first post"));
        assert_eq!(fm.featured_image.as_deref(), Some("./cover.png"));
        assert_eq!(fm.tags, Some(vec!["go".to_string(), "rust".to_string()]));
        assert!(!fm.draft);
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_null_and_empty_description() {
        let (fm, _) = FrontMatter::parse("---\ntitle: a\ndescription:\n---\nbody").unwrap();
        assert_eq!(fm.description, None);

        let (fm, _) = FrontMatter::parse("---\ntitle: a\ndescription: \"\"\n---\nbody").unwrap();
        assert_eq!(fm.description.as_deref(), Some(""));
    }

    #[test]
    fn test_tags_absent_null_or_single() {
        let (fm, _) = FrontMatter::parse("---\ntitle: a\n---\nbody").unwrap();
        assert_eq!(fm.tags, None);

        let (fm, _) = FrontMatter::parse("---\ntitle: a\ntags:\n---\nbody").unwrap();
        assert_eq!(fm.tags, None);

        let (fm, _) = FrontMatter::parse("---\ntitle: a\ntags: Notes\n---\nbody").unwrap();
        assert_eq!(fm.tags, Some(vec!["Notes".to_string()]));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just markdown").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "# Just markdown");
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = "---\n\nSome prose, not metadata.\n\n---\nMore content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("Some prose"));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\nbody").unwrap_err();
        assert!(matches!(err, ContentError::UnterminatedFrontmatter));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, ContentError::Frontmatter(_)));
    }

    #[test]
    fn test_parse_date_in_timezone() {
        let fm = FrontMatter {
            date: Some("2021-01-01 09:00:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date(chrono_tz::Asia::Seoul).unwrap().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M %z").to_string(), "2021-01-01 09:00 +0900");
    }

    #[test]
    fn test_parse_invalid_date() {
        let fm = FrontMatter {
            date: Some("someday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fm.parse_date(chrono_tz::UTC),
            Err(ContentError::InvalidDate(_))
        ));
    }
}
