//! Responsive image block
//!
//! The wrapper reserves the image's box with a padding placeholder sized by
//! the descriptor's aspect ratio, and the image is stretched over it with
//! `object-fit: cover`. The rendered box therefore always has the descriptor's
//! ratio, whatever the source file's proportions are.

use crate::content::FluidImage;
use crate::helpers::{attrs, html_escape};

pub struct FluidImageProps<'a> {
    pub fluid: &'a FluidImage,
    pub class: &'a str,
    pub alt: &'a str,
    /// Extra inline style for the `<img>` element
    pub img_style: Option<&'a str>,
}

pub fn fluid_image(props: &FluidImageProps<'_>) -> String {
    let fluid = props.fluid;
    let ratio = fluid.aspect_ratio;
    let padding = 100.0 / ratio;

    let mut img_style = String::from(
        "position:absolute;top:0;left:0;width:100%;height:100%;object-fit:cover;object-position:center",
    );
    if let Some(extra) = props.img_style {
        img_style.push(';');
        img_style.push_str(extra);
    }

    let src_set = fluid.src_set_attr();
    let img_attrs = attrs(&[
        ("sizes", Some(fluid.sizes.as_str())),
        ("srcset", src_set.as_deref()),
        ("src", Some(fluid.src.as_str())),
        ("alt", Some(props.alt)),
        ("loading", Some("lazy")),
        ("style", Some(img_style.as_str())),
    ]);

    format!(
        concat!(
            r#"<div class="gatsby-image-wrapper {class}" style="position:relative;overflow:hidden" data-aspect-ratio="{ratio}">"#,
            r#"<div aria-hidden="true" style="width:100%;padding-bottom:{padding}%"></div>"#,
            r#"<picture><img{img_attrs}></picture>"#,
            r#"</div>"#
        ),
        class = html_escape(props.class),
        ratio = ratio,
        padding = padding,
        img_attrs = img_attrs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_follows_descriptor_ratio() {
        let fluid = FluidImage::from_dimensions("/a.png", 800, 800, 976).with_aspect_ratio(2.0);
        let html = fluid_image(&FluidImageProps {
            fluid: &fluid,
            class: "w-full",
            alt: "thumbnail",
            img_style: None,
        });
        assert!(html.contains("padding-bottom:50%"));
        assert!(html.contains(r#"data-aspect-ratio="2""#));
        assert!(html.contains(r#"srcset="/a.png 800w""#));
        assert!(html.contains(r#"alt="thumbnail""#));
        assert_eq!(html.matches("<img").count(), 1);
    }

    #[test]
    fn test_extra_img_style_is_appended() {
        let fluid = FluidImage::from_dimensions("/a.png", 10, 10, 976);
        let html = fluid_image(&FluidImageProps {
            fluid: &fluid,
            class: "",
            alt: "",
            img_style: Some("opacity:1"),
        });
        assert!(html.contains("object-position:center;opacity:1"));
    }
}
