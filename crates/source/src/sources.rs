//! Where manifests come from: in-memory records, readers, files and directories.

use std::fs;
use std::io::Read;
use std::path::{Path as StdPath, PathBuf};

use manifold_core::Resource;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{decode, SourceError, SourceResult};

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

pub trait Source {
    fn load(self) -> SourceResult<Vec<Resource>>;
}

/// Records already in memory.
#[derive(Debug, Clone, Default)]
pub struct Slice(pub Vec<Resource>);

impl Source for Slice {
    fn load(self) -> SourceResult<Vec<Resource>> {
        Ok(self.0)
    }
}

/// Any byte stream of YAML documents, e.g. stdin.
pub struct Reader<R>(pub R);

impl<R: Read> Source for Reader<R> {
    fn load(self) -> SourceResult<Vec<Resource>> {
        decode(self.0)
    }
}

/// A file, or the manifest files directly inside a directory.
#[derive(Debug, Clone)]
pub struct Path(pub PathBuf);

impl Source for Path {
    fn load(self) -> SourceResult<Vec<Resource>> {
        let root = self.0;
        if !is_dir(&root)? {
            return decode_file(&root);
        }
        let mut files = Vec::new();
        let entries = fs::read_dir(&root).map_err(|source| SourceError::Io { path: root.clone(), source })?;
        for entry in entries {
            let entry = entry.map_err(|source| SourceError::Io { path: root.clone(), source })?;
            let path = entry.path();
            if path.is_file() && is_manifest_file(&path) {
                files.push(path);
            }
        }
        decode_files(files)
    }
}

/// Like [`Path`], descending into subdirectories.
#[derive(Debug, Clone)]
pub struct Recursive(pub PathBuf);

impl Source for Recursive {
    fn load(self) -> SourceResult<Vec<Resource>> {
        let root = self.0;
        if !is_dir(&root)? {
            return decode_file(&root);
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&root) {
            let entry = entry?;
            if entry.file_type().is_file() && is_manifest_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        decode_files(files)
    }
}

fn is_dir(path: &StdPath) -> SourceResult<bool> {
    fs::metadata(path)
        .map(|m| m.is_dir())
        .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })
}

fn is_manifest_file(path: &StdPath) -> bool {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MANIFEST_EXTENSIONS.contains(&e));
    if !ok {
        debug!(path = %path.display(), "skipping non-manifest file");
    }
    ok
}

// Sorted by path so directory listings decode in a stable order.
fn decode_files(mut files: Vec<PathBuf>) -> SourceResult<Vec<Resource>> {
    files.sort();
    if files.is_empty() {
        warn!("no manifest files found");
    }
    let mut out = Vec::new();
    for path in files {
        out.extend(decode_file(&path)?);
    }
    Ok(out)
}

fn decode_file(path: &StdPath) -> SourceResult<Vec<Resource>> {
    let file = fs::File::open(path).map_err(|source| SourceError::Io { path: path.to_path_buf(), source })?;
    let resources = decode(file).map_err(|e| SourceError::File { path: path.to_path_buf(), source: Box::new(e) })?;
    debug!(path = %path.display(), resources = resources.len(), "loaded manifest file");
    Ok(resources)
}
