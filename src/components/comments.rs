//! Deferred comment widget
//!
//! The widget is mounted by a small inline script that runs once the page has
//! been attached to the document. It mounts into [`COMMENT_ANCHOR_ID`] at most
//! once per page view and does nothing when the anchor is missing.

use crate::config::CommentsConfig;

pub const COMMENT_ANCHOR_ID: &str = "utterances";

const UTTERANCES_CLIENT: &str = "https://utteranc.es/client.js";

/// A third-party widget mounted into a page after it loads
pub trait CommentWidget {
    /// Attributes handed to the widget's loader script
    fn attributes(&self) -> Vec<(&'static str, String)>;

    /// URL of the loader script
    fn client_url(&self) -> &str;

    /// Inline script mounting the widget into the element with id `anchor_id`
    fn mount_script(&self, anchor_id: &str) -> String {
        let set_attributes: String = self
            .attributes()
            .iter()
            .map(|(name, value)| {
                format!(
                    "    script.setAttribute({}, {});\n",
                    js_string(name),
                    js_string(value)
                )
            })
            .collect();

        format!(
            r#"<script>
(function () {{
  var mount = function () {{
    var anchor = document.getElementById({anchor});
    if (!anchor || anchor.dataset.mounted) return;
    anchor.dataset.mounted = "true";
    var script = document.createElement("script");
    script.src = {client};
    script.async = true;
    script.crossOrigin = "anonymous";
{set_attributes}    anchor.appendChild(script);
  }};
  if (document.readyState === "loading") {{
    document.addEventListener("DOMContentLoaded", mount, {{ once: true }});
  }} else {{
    mount();
  }}
}})();
</script>"#,
            anchor = js_string(anchor_id),
            client = js_string(self.client_url()),
            set_attributes = set_attributes,
        )
    }
}

/// GitHub-issue backed comments
pub struct Utterances<'a> {
    config: &'a CommentsConfig,
}

impl<'a> Utterances<'a> {
    /// `None` unless comments are enabled for a repository
    pub fn from_config(config: &'a CommentsConfig) -> Option<Self> {
        config.is_active().then_some(Self { config })
    }
}

impl CommentWidget for Utterances<'_> {
    fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![
            ("repo", self.config.repo.clone()),
            ("issue-term", self.config.issue_term.clone()),
        ];
        if let Some(label) = &self.config.label {
            attributes.push(("label", label.clone()));
        }
        attributes.push(("theme", self.config.theme.clone()));
        attributes
    }

    fn client_url(&self) -> &str {
        UTTERANCES_CLIENT
    }
}

/// The element a comment widget mounts into
pub fn comment_anchor() -> String {
    format!(r#"<div id="{}"></div>"#, COMMENT_ANCHOR_ID)
}

/// Quote a value as a JavaScript string literal safe inside `<script>`
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CommentsConfig {
        CommentsConfig {
            enable: true,
            repo: "hw0k/blog-comments".to_string(),
            label: Some("💬".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_inactive_config_has_no_widget() {
        assert!(Utterances::from_config(&CommentsConfig::default()).is_none());
        let no_repo = CommentsConfig {
            enable: true,
            ..Default::default()
        };
        assert!(Utterances::from_config(&no_repo).is_none());
    }

    #[test]
    fn test_mount_script() {
        let config = config();
        let widget = Utterances::from_config(&config).unwrap();
        let script = widget.mount_script(COMMENT_ANCHOR_ID);
        assert!(script.contains(r#"document.getElementById("utterances")"#));
        assert!(script.contains(r#"script.src = "https://utteranc.es/client.js";"#));
        assert!(script.contains(r#"script.setAttribute("repo", "hw0k/blog-comments");"#));
        assert!(script.contains(r#"script.setAttribute("issue-term", "pathname");"#));
        assert!(script.contains(r#"script.setAttribute("label", "💬");"#));
        assert!(script.contains(r#"script.setAttribute("theme", "github-light");"#));
        assert!(script.contains("anchor.dataset.mounted"));
        assert!(script.contains("DOMContentLoaded"));
    }

    #[test]
    fn test_js_string_cannot_close_script() {
        assert_eq!(js_string("a</script>\"b"), r#""a<\/script>\"b""#);
    }

    #[test]
    fn test_comment_anchor() {
        assert_eq!(comment_anchor(), r#"<div id="utterances"></div>"#);
    }
}
