//! Component substitution for rendered post bodies
//!
//! A [`ComponentMap`] lets the page replace how individual Markdown elements
//! are turned into HTML. Elements without a registered component fall back to
//! the renderer's default output.

use std::collections::HashMap;
use std::fmt;

/// A Markdown element offered for substitution
#[derive(Debug, Clone, PartialEq)]
pub enum Element<'a> {
    /// Fenced or indented code block
    CodeBlock { lang: Option<&'a str>, code: &'a str },
    /// Inline image, `src` already resolved against the post's location
    Image {
        src: &'a str,
        alt: &'a str,
        title: &'a str,
    },
}

impl Element<'_> {
    /// The HTML element name components are registered under
    pub fn name(&self) -> &'static str {
        match self {
            Element::CodeBlock { .. } => "pre",
            Element::Image { .. } => "img",
        }
    }
}

type Component = Box<dyn Fn(&Element<'_>) -> Option<String> + Send + Sync>;

/// Registered element substitutions, keyed by element name
#[derive(Default)]
pub struct ComponentMap {
    components: HashMap<&'static str, Component>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component for `name`; returning `None` keeps the default output
    pub fn with<F>(mut self, name: &'static str, component: F) -> Self
    where
        F: Fn(&Element<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.components.insert(name, Box::new(component));
        self
    }

    /// Render `element` through its registered component, if any
    pub fn render(&self, element: &Element<'_>) -> Option<String> {
        self.components
            .get(element.name())
            .and_then(|component| component(element))
    }
}

impl fmt::Debug for ComponentMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.components.keys().collect();
        names.sort();
        f.debug_struct("ComponentMap")
            .field("components", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_renders_nothing() {
        let map = ComponentMap::new();
        let element = Element::CodeBlock {
            lang: Some("rust"),
            code: "fn main() {}",
        };
        assert_eq!(map.render(&element), None);
    }

    #[test]
    fn test_component_is_chosen_by_element_name() {
        let map = ComponentMap::new().with("img", |el| match el {
            Element::Image { src, .. } => Some(format!("<figure>{}</figure>", src)),
            _ => None,
        });

        let image = Element::Image {
            src: "/a.png",
            alt: "",
            title: "",
        };
        assert_eq!(map.render(&image).as_deref(), Some("<figure>/a.png</figure>"));

        let code = Element::CodeBlock {
            lang: None,
            code: "x",
        };
        assert_eq!(map.render(&code), None);
    }
}
