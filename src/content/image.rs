//! Responsive image descriptors
//!
//! Images are never resized or re-encoded. A descriptor only records where the
//! file is published and its native proportions, which is enough to reserve the
//! image's box before it loads.

use std::path::Path;

/// Ratio used when an image's dimensions cannot be read
pub const FALLBACK_ASPECT_RATIO: f64 = 1.5;

/// One entry of an image's `srcset`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub url: String,
    pub width: u32,
}

/// A width-independent image description laid out by its aspect ratio
#[derive(Debug, Clone, PartialEq)]
pub struct FluidImage {
    pub src: String,
    pub src_set: Vec<ImageSource>,
    pub sizes: String,
    /// width / height
    pub aspect_ratio: f64,
    pub presentation_width: u32,
}

impl FluidImage {
    /// Describe the image at `path`, published under `url`
    pub fn from_file(path: &Path, url: &str, max_width: u32) -> Self {
        match ::image::image_dimensions(path) {
            Ok((width, height)) if width > 0 && height > 0 => {
                Self::from_dimensions(url, width, height, max_width)
            }
            Ok(_) | Err(_) => {
                tracing::warn!(
                    "Could not read dimensions of {:?}, assuming {}:1",
                    path,
                    FALLBACK_ASPECT_RATIO
                );
                Self {
                    src: url.to_string(),
                    src_set: Vec::new(),
                    sizes: sizes_for(max_width),
                    aspect_ratio: FALLBACK_ASPECT_RATIO,
                    presentation_width: max_width,
                }
            }
        }
    }

    /// Describe an image whose native size is already known
    pub fn from_dimensions(url: &str, width: u32, height: u32, max_width: u32) -> Self {
        let presentation_width = width.min(max_width);
        Self {
            src: url.to_string(),
            src_set: vec![ImageSource {
                url: url.to_string(),
                width,
            }],
            sizes: sizes_for(presentation_width),
            aspect_ratio: width as f64 / height as f64,
            presentation_width,
        }
    }

    /// Same image, laid out at a different aspect ratio
    pub fn with_aspect_ratio(&self, aspect_ratio: f64) -> Self {
        Self {
            aspect_ratio,
            ..self.clone()
        }
    }

    /// The `srcset` attribute value, if any source width is known
    pub fn src_set_attr(&self) -> Option<String> {
        if self.src_set.is_empty() {
            return None;
        }
        Some(
            self.src_set
                .iter()
                .map(|s| format!("{} {}w", s.url, s.width))
                .collect::<Vec<_>>()
                .join(",\n"),
        )
    }
}

fn sizes_for(width: u32) -> String {
    format!("(max-width: {w}px) 100vw, {w}px", w = width)
}

/// A post's hero image
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedImage {
    pub fluid: FluidImage,
    /// Absolute URL of the original file, used for social previews
    pub public_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dimensions() {
        let fluid = FluidImage::from_dimensions("/posts/a/cover.png", 2000, 1000, 976);
        assert_eq!(fluid.aspect_ratio, 2.0);
        assert_eq!(fluid.presentation_width, 976);
        assert_eq!(fluid.sizes, "(max-width: 976px) 100vw, 976px");
        assert_eq!(
            fluid.src_set_attr().as_deref(),
            Some("/posts/a/cover.png 2000w")
        );
    }

    #[test]
    fn test_small_image_keeps_native_width() {
        let fluid = FluidImage::from_dimensions("/a.png", 400, 400, 976);
        assert_eq!(fluid.presentation_width, 400);
    }

    #[test]
    fn test_with_aspect_ratio_keeps_sources() {
        let fluid = FluidImage::from_dimensions("/a.png", 400, 300, 976);
        let wide = fluid.with_aspect_ratio(21.0 / 9.0);
        assert_eq!(wide.aspect_ratio, 21.0 / 9.0);
        assert_eq!(wide.src_set, fluid.src_set);
        assert_eq!(fluid.aspect_ratio, 400.0 / 300.0);
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        let fluid = FluidImage::from_file(&path, "/broken.png", 976);
        assert_eq!(fluid.aspect_ratio, FALLBACK_ASPECT_RATIO);
        assert!(fluid.src_set_attr().is_none());
    }
}
