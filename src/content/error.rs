//! Errors raised while loading content

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("frontmatter block is never closed")]
    UnterminatedFrontmatter,

    #[error("unrecognised date {0:?}")]
    InvalidDate(String),
}
