use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{GifMakerError, GifMakerResult};

/// One immediate child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name of the entry (no directory part).
    pub name: OsString,
    /// Whether the entry resolves to a directory.
    pub is_dir: bool,
}

impl DirEntryInfo {
    /// A sub-directory entry.
    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    /// A non-directory entry.
    pub fn file(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

/// Capability for listing the immediate entries of a directory.
///
/// Entry order is unspecified; the collector sorts what it keeps.
pub trait DirLister {
    /// List the immediate children of `dir`.
    fn list(&self, dir: &Path) -> GifMakerResult<Vec<DirEntryInfo>>;
}

impl<L: DirLister + ?Sized> DirLister for &L {
    fn list(&self, dir: &Path) -> GifMakerResult<Vec<DirEntryInfo>> {
        (**self).list(dir)
    }
}

/// Lists directories on the local filesystem.
///
/// `is_dir` follows symlinks, so a link to a directory is traversed like a directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, dir: &Path) -> GifMakerResult<Vec<DirEntryInfo>> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("failed to list directory '{}'", dir.display()))?;

        let mut out = Vec::new();
        for entry in rd {
            let entry =
                entry.with_context(|| format!("failed to read entry in '{}'", dir.display()))?;
            out.push(DirEntryInfo {
                is_dir: entry.path().is_dir(),
                name: entry.file_name(),
            });
        }
        Ok(out)
    }
}

/// In-memory directory tree.
///
/// Used by tests and for dry runs over a known layout without touching disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryLister {
    dirs: BTreeMap<PathBuf, Vec<DirEntryInfo>>,
}

impl MemoryLister {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory (and its ancestors). Existing entries are kept.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path.as_ref());
        self
    }

    /// Register a file (and its ancestor directories).
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref());
        self
    }

    /// Register a directory (and its ancestors).
    pub fn add_dir(&mut self, path: &Path) {
        if self.dirs.contains_key(path) {
            return;
        }
        self.dirs.insert(path.to_path_buf(), Vec::new());
        if let (Some(parent), Some(name)) = (parent_of(path), path.file_name()) {
            self.add_dir(parent);
            self.push_entry(parent, DirEntryInfo::dir(name));
        }
    }

    /// Register a file (and its ancestor directories).
    pub fn add_file(&mut self, path: &Path) {
        let (Some(parent), Some(name)) = (parent_of(path), path.file_name()) else {
            return;
        };
        self.add_dir(parent);
        self.push_entry(parent, DirEntryInfo::file(name));
    }

    fn push_entry(&mut self, dir: &Path, entry: DirEntryInfo) {
        let entries = self.dirs.entry(dir.to_path_buf()).or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
}

impl DirLister for MemoryLister {
    fn list(&self, dir: &Path) -> GifMakerResult<Vec<DirEntryInfo>> {
        self.dirs.get(dir).cloned().ok_or_else(|| {
            GifMakerError::Other(anyhow::anyhow!(
                "failed to list directory '{}': not found",
                dir.display()
            ))
        })
    }
}

fn parent_of(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/collect/listing.rs"]
mod tests;
