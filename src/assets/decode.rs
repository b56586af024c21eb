use std::path::{Path, PathBuf};

use crate::{
    assets::FrameRGBA,
    foundation::core::FrameIndex,
    foundation::error::{GifMakerError, GifMakerResult},
};

/// Decode the image at `path` into straight-alpha RGBA8.
///
/// The format is picked from the file extension.
pub fn decode_frame(path: &Path) -> GifMakerResult<FrameRGBA> {
    let dyn_img = image::open(path).map_err(|source| GifMakerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FrameRGBA::from_rgba_image(dyn_img.to_rgba8()))
}

/// Lazily decodes frame paths in order.
///
/// Finite and single-pass: each file is read when the iterator reaches it.
#[derive(Debug)]
pub struct DecodedFrames<'a> {
    paths: std::iter::Enumerate<std::slice::Iter<'a, PathBuf>>,
}

impl<'a> DecodedFrames<'a> {
    /// Iterate over `paths` in the order given.
    pub fn new(paths: &'a [PathBuf]) -> Self {
        Self {
            paths: paths.iter().enumerate(),
        }
    }
}

impl Iterator for DecodedFrames<'_> {
    type Item = GifMakerResult<(FrameIndex, FrameRGBA)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (i, path) = self.paths.next()?;
        tracing::debug!(index = i, path = %path.display(), "decoding frame");
        Some(decode_frame(path).map(|frame| (FrameIndex(i as u64), frame)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
