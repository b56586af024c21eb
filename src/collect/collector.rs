use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use crate::collect::listing::{DirLister, FsLister};
use crate::foundation::error::{GifMakerError, GifMakerResult};

/// Options for [`FrameCollector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectOpts {
    /// Recognized frame extensions, without the dot. Matched ASCII case-insensitively.
    pub extensions: Vec<String>,
    /// Deepest nesting below a root before the walk gives up.
    pub max_depth: usize,
}

impl Default for CollectOpts {
    fn default() -> Self {
        Self {
            extensions: vec![Self::DEFAULT_EXTENSION.to_string()],
            max_depth: 64,
        }
    }
}

impl CollectOpts {
    /// Extension used when none is configured.
    pub const DEFAULT_EXTENSION: &'static str = "tif";

    /// Options recognizing the given extensions (leading dots are stripped).
    pub fn with_extensions<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: exts
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            ..Self::default()
        }
    }

    /// `true` when a non-directory entry called `name` is a frame file.
    pub fn is_frame_name(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy().to_ascii_lowercase();
        self.extensions.iter().any(|ext| {
            name.len() > ext.len() + 1
                && name.ends_with(ext.as_str())
                && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
        })
    }

    /// Reject option sets that can never match a frame.
    pub fn validate(&self) -> GifMakerResult<()> {
        if self.extensions.is_empty() {
            return Err(GifMakerError::validation(
                "at least one frame extension is required",
            ));
        }
        Ok(())
    }
}

/// Depth-first frame discovery over an injected [`DirLister`].
///
/// Every visited directory must hold only sub-directories or only frame files. Frames are
/// returned in lexicographic depth-first order, roots concatenated in the order given.
#[derive(Clone, Debug)]
pub struct FrameCollector<L> {
    lister: L,
    opts: CollectOpts,
}

impl<L: DirLister> FrameCollector<L> {
    /// Create a collector.
    pub fn new(lister: L, opts: CollectOpts) -> Self {
        Self { lister, opts }
    }

    /// Options in use.
    pub fn opts(&self) -> &CollectOpts {
        &self.opts
    }

    /// Collect the ordered frame paths below every root.
    ///
    /// Fails without a partial result on the first structural violation or listing error.
    #[tracing::instrument(skip(self, roots), fields(roots = roots.len()))]
    pub fn collect(&self, roots: &[PathBuf]) -> GifMakerResult<Vec<PathBuf>> {
        self.opts.validate()?;

        let mut out = Vec::new();
        for root in roots {
            let before = out.len();
            self.collect_dir(root, 0, &mut out)?;
            tracing::debug!(root = %root.display(), frames = out.len() - before, "root collected");
        }

        tracing::info!(frames = out.len(), "frame collection complete");
        Ok(out)
    }

    fn collect_dir(&self, dir: &Path, depth: usize, out: &mut Vec<PathBuf>) -> GifMakerResult<()> {
        if depth > self.opts.max_depth {
            return Err(GifMakerError::structural(
                dir,
                format!("nesting exceeds max depth {}", self.opts.max_depth),
            ));
        }

        let mut subdirs = Vec::<OsString>::new();
        let mut frames = Vec::<OsString>::new();
        for entry in self.lister.list(dir)? {
            if entry.is_dir {
                subdirs.push(entry.name);
            } else if self.opts.is_frame_name(&entry.name) {
                frames.push(entry.name);
            }
        }

        match (subdirs.is_empty(), frames.is_empty()) {
            (true, false) => {
                frames.sort();
                tracing::debug!(dir = %dir.display(), frames = frames.len(), "leaf directory");
                out.extend(frames.iter().map(|name| dir.join(name)));
                Ok(())
            }
            (false, true) => {
                subdirs.sort();
                tracing::debug!(dir = %dir.display(), subdirs = subdirs.len(), "branch directory");
                for name in &subdirs {
                    self.collect_dir(&dir.join(name), depth + 1, out)?;
                }
                Ok(())
            }
            (true, true) => Err(GifMakerError::structural(
                dir,
                "directory contains neither sub-directories nor frame files",
            )),
            (false, false) => Err(GifMakerError::structural(
                dir,
                format!(
                    "directory mixes {} sub-directories with {} frame files",
                    subdirs.len(),
                    frames.len()
                ),
            )),
        }
    }
}

/// Collect frames below `roots` on the local filesystem.
pub fn collect_frames(roots: &[PathBuf], opts: &CollectOpts) -> GifMakerResult<Vec<PathBuf>> {
    FrameCollector::new(FsLister, opts.clone()).collect(roots)
}

#[cfg(test)]
#[path = "../../tests/unit/collect/collector.rs"]
mod tests;
