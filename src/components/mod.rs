//! Page components
//!
//! Every component is a plain function from its props to an HTML string. The
//! data they receive is fully resolved by the content loader, so rendering
//! never fails on missing optional fields: it omits the affected markup.

mod comments;
mod fluid_image;
mod layout;
mod mdx;
mod post_item;
mod post_list;
mod post_template;
mod seo;
mod tag;

pub use comments::{comment_anchor, CommentWidget, Utterances, COMMENT_ANCHOR_ID};
pub use fluid_image::{fluid_image, FluidImageProps};
pub use layout::{layout, LayoutProps};
pub use mdx::{ComponentMap, Element};
pub use post_item::{post_item, PostItemProps};
pub use post_list::{post_list_page, Pagination, PostListProps};
pub use post_template::{keywords, PageContext, PostQuery, PostTemplate};
pub use seo::{MetaTag, Seo};
pub use tag::{tag, tag_key, tag_link, tag_link_row, tag_row};

/// Thumbnails and hero images are always laid out at this ratio
pub const COVER_ASPECT_RATIO: f64 = 21.0 / 9.0;
