//! Manifold sources: turn YAML streams, files and directories into manifests.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use manifold_core::Manifest;

mod decode;
mod sources;

pub use decode::{decode, decode_str, decode_with, DecodeLimits};
pub use sources::{Path, Reader, Recursive, Slice, Source};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("reading manifest stream: {0}")]
    Read(#[from] std::io::Error),
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("walking manifest directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}: {source}", .path.display())]
    File { path: PathBuf, #[source] source: Box<SourceError> },
    #[error("manifest stream too large (>{limit} bytes)")]
    TooLarge { limit: usize },
    #[error("document {document}: invalid YAML: {source}")]
    Parse { document: usize, #[source] source: serde_yaml::Error },
    #[error("document {document}: not a mapping")]
    NotAMapping { document: usize },
    #[error("document {document}: cannot convert to JSON: {source}")]
    Convert { document: usize, #[source] source: serde_json::Error },
    #[error("document {document}: too complex (>{limit} nodes)")]
    TooComplex { document: usize, limit: usize },
}

impl SourceError {
    /// True when the input itself was malformed, as opposed to an I/O or limit failure.
    pub fn is_parse(&self) -> bool {
        match self {
            SourceError::Parse { .. } | SourceError::NotAMapping { .. } | SourceError::Convert { .. } => true,
            SourceError::File { source, .. } => source.is_parse(),
            _ => false,
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Load `source` into a manifest, preserving document order.
pub fn manifest_from<S: Source>(source: S) -> SourceResult<Manifest> {
    source.load().map(Manifest::new)
}
