//! Content validation errors

use std::path::PathBuf;
use thiserror::Error;

/// Problems found while turning source files into feed entries
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Front-matter error in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("Post {path} has an empty title")]
    EmptyTitle { path: PathBuf },

    #[error("Slug {slug} is used by both {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Slug {slug} of {id} would overwrite the generated {reserved}")]
    ReservedSlug {
        slug: String,
        id: String,
        reserved: String,
    },

    #[error("Slug {slug} of {id} is not a plain path under the output directory")]
    InvalidSlug { slug: String, id: String },

    #[error("Entry id {0} appears more than once")]
    DuplicateId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
