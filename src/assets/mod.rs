//! Static asset discovery
//!
//! Walks a static-assets root through a file-provider abstraction, expands
//! fingerprinted variants, and produces the deduplicated copy schedule the
//! generator pushes through the content pipeline.

mod fingerprint;

pub use fingerprint::pair_fingerprint_variants;

use crate::config::ContentToCopy;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// One directory entry as seen by an [`AssetProvider`]
#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub name: String,
    pub is_directory: bool,
    /// Physical path of the file, if it exists on disk
    pub physical_path: Option<PathBuf>,
}

/// Anything capable of listing directory contents recursively
///
/// `sub_path` is either empty (the root) or a `/`-terminated relative path.
pub trait AssetProvider {
    fn directory_contents(&self, sub_path: &str) -> io::Result<Vec<AssetEntry>>;
}

/// Filesystem-backed asset provider rooted at a directory
pub struct FsAssetProvider {
    root: PathBuf,
}

impl FsAssetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsAssetProvider { root: root.into() }
    }
}

impl AssetProvider for FsAssetProvider {
    fn directory_contents(&self, sub_path: &str) -> io::Result<Vec<AssetEntry>> {
        let dir = self.root.join(sub_path);
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            entries.push(AssetEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_directory: file_type.is_dir(),
                physical_path: Some(entry.path()),
            });
        }
        // read_dir order is platform-dependent; sort for a stable schedule.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Discovers every file under the provider's root and expands fingerprinted
/// variants, deduplicated by (source, target) identity
pub fn discover_default_assets(provider: &dyn AssetProvider) -> io::Result<Vec<ContentToCopy>> {
    let mut assets = Vec::new();
    collect_assets(provider, "", &mut assets)?;

    let paired = pair_fingerprint_variants(&assets);
    assets.extend(paired);

    Ok(dedup_assets(assets))
}

fn collect_assets(
    provider: &dyn AssetProvider,
    sub_path: &str,
    assets: &mut Vec<ContentToCopy>,
) -> io::Result<()> {
    for item in provider.directory_contents(sub_path)? {
        let full_path = format!("{}{}", sub_path, item.name);
        if item.is_directory {
            collect_assets(provider, &format!("{}/", full_path), assets)?;
        } else if let Some(physical) = item.physical_path {
            assets.push(ContentToCopy::new(physical, full_path));
        }
    }
    Ok(())
}

/// Removes duplicate (source, target) pairs, keeping first occurrence order
pub fn dedup_assets(assets: Vec<ContentToCopy>) -> Vec<ContentToCopy> {
    let mut seen = HashSet::new();
    assets
        .into_iter()
        .filter(|a| seen.insert((a.source.clone(), a.target.clone())))
        .collect()
}

/// Converts an output-relative `/`-separated target into a path under `root`
pub fn target_on_disk(root: &Path, target: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in target.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}
