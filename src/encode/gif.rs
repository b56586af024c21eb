use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::assets::FrameRGBA;
use crate::encode::sink::{EncodeState, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifMakerError, GifMakerResult};

/// Options for [`GifSink`] output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// Output GIF file path, used as given.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Keep a partially written file when encoding fails.
    pub keep_partial: bool,
    /// Loop count; `None` loops forever.
    pub loops: Option<u16>,
    /// Palette quantization speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl GifSinkOpts {
    /// Create options for writing a GIF to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            keep_partial: false,
            loops: None,
            speed: 10,
        }
    }

    fn repeat(&self) -> Repeat {
        match self.loops {
            Some(n) => Repeat::Finite(n),
            None => Repeat::Infinite,
        }
    }
}

/// Sink that streams frames into a GIF file.
///
/// The file is created in `begin` and completed in `end`. On `abort` the writer is released
/// and the file removed unless `keep_partial` is set.
pub struct GifSink {
    opts: GifSinkOpts,
    encoder: Option<GifEncoder<BufWriter<TrackedWriter<File>>>>,
    write_errors: WriteErrorSlot,
    // Second handle on the output, used to sync once the encoder has been dropped.
    file: Option<File>,
    created: bool,
    cfg: Option<SinkConfig>,
    state: EncodeState,
}

impl GifSink {
    /// Create a new sink writing to `opts.out_path`.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            write_errors: WriteErrorSlot::default(),
            file: None,
            created: false,
            cfg: None,
            state: EncodeState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EncodeState {
        self.state
    }

    /// Output path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn fail(&mut self, err: GifMakerError) -> GifMakerError {
        self.state = EncodeState::Failed;
        err
    }
}

impl std::fmt::Debug for GifSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSink")
            .field("opts", &self.opts)
            .field("state", &self.state)
            .field("created", &self.created)
            .finish()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> GifMakerResult<()> {
        if self.state != EncodeState::Idle {
            return Err(GifMakerError::validation(format!(
                "gif sink cannot begin from state {:?}",
                self.state
            )));
        }
        if !(1..=30).contains(&self.opts.speed) {
            return Err(GifMakerError::validation(format!(
                "gif speed must be within 1..=30, got {}",
                self.opts.speed
            )));
        }
        if !cfg.delay.is_gif_exact() {
            tracing::warn!(
                delay_secs = cfg.delay.as_secs_f64(),
                "delay is not a multiple of 10ms; GIF viewers will see it rounded"
            );
        }

        ensure_parent_dir(&self.opts.out_path)?;
        let file = create_output(&self.opts.out_path, self.opts.overwrite)?;
        self.created = true;
        let sync_handle = file.try_clone().with_context(|| {
            format!(
                "failed to duplicate handle for '{}'",
                self.opts.out_path.display()
            )
        })?;

        let writer = TrackedWriter::new(file, self.write_errors.clone());
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(writer), self.opts.speed);
        encoder
            .set_repeat(self.opts.repeat())
            .map_err(|e| GifMakerError::encode(format!("failed to set loop mode: {e}")))?;

        tracing::debug!(
            out = %self.opts.out_path.display(),
            frames = cfg.frame_count,
            "gif writer opened"
        );
        self.encoder = Some(encoder);
        self.file = Some(sync_handle);
        self.cfg = Some(cfg);
        self.state = EncodeState::Writing {
            next: FrameIndex(0),
        };
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: FrameRGBA) -> GifMakerResult<()> {
        let EncodeState::Writing { next } = self.state else {
            return Err(GifMakerError::validation(format!(
                "gif sink is not accepting frames in state {:?}",
                self.state
            )));
        };
        if idx != next {
            return Err(self.fail(GifMakerError::validation(format!(
                "gif sink expected frame {} but received frame {}",
                next.0, idx.0
            ))));
        }
        let Some(delay) = self.cfg.map(|c| c.delay.round_to_gif_tick()) else {
            return Err(self.fail(GifMakerError::encode("gif sink not started")));
        };

        let (w, h) = (frame.width, frame.height);
        let Some(buf) = frame.into_rgba_image() else {
            return Err(self.fail(GifMakerError::validation(format!(
                "frame {} pixel buffer does not match {w}x{h}",
                idx.0
            ))));
        };

        let Some(encoder) = self.encoder.as_mut() else {
            return Err(self.fail(GifMakerError::encode("gif writer already released")));
        };
        let gif_frame = image::Frame::from_parts(buf, 0, 0, delay.to_image_delay());
        if let Err(e) = encoder.encode_frame(gif_frame) {
            return Err(self.fail(GifMakerError::encode(format!(
                "failed to write frame {}: {e}",
                idx.0
            ))));
        }

        self.state = EncodeState::Writing { next: idx.next() };
        Ok(())
    }

    fn end(&mut self) -> GifMakerResult<()> {
        let EncodeState::Writing { next } = self.state else {
            return Err(GifMakerError::validation(format!(
                "gif sink cannot finish from state {:?}",
                self.state
            )));
        };
        if next.0 == 0 {
            return Err(self.fail(GifMakerError::EmptyInput));
        }

        if let Some(encoder) = self.encoder.take()
            && let Err(e) = finish_encoder(encoder, &self.write_errors)
        {
            return Err(self.fail(GifMakerError::encode(format!(
                "failed to finish '{}': {e}",
                self.opts.out_path.display()
            ))));
        }
        if let Some(file) = self.file.take()
            && let Err(e) = file.sync_all()
        {
            return Err(self.fail(GifMakerError::encode(format!(
                "failed to sync '{}': {e}",
                self.opts.out_path.display()
            ))));
        }

        self.state = EncodeState::Finalized;
        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = next.0,
            "gif finalized"
        );
        Ok(())
    }

    fn abort(&mut self) -> GifMakerResult<()> {
        if self.state == EncodeState::Finalized {
            return Ok(());
        }
        drop(self.encoder.take());
        drop(self.file.take());
        self.state = EncodeState::Failed;

        if !self.created || self.opts.keep_partial {
            return Ok(());
        }
        self.created = false;
        match std::fs::remove_file(&self.opts.out_path) {
            Ok(()) => {
                tracing::warn!(out = %self.opts.out_path.display(), "removed partial gif");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!(
                    "failed to remove partial output '{}'",
                    self.opts.out_path.display()
                ))
                .into()),
        }
    }
}

/// First I/O error seen by a [`TrackedWriter`], shared with the sink that owns it.
#[derive(Clone, Debug, Default)]
struct WriteErrorSlot(Arc<Mutex<Option<io::Error>>>);

impl WriteErrorSlot {
    fn record(&self, err: io::Error) -> io::Error {
        let copy = io::Error::new(err.kind(), err.to_string());
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert(err);
        copy
    }

    fn take(&self) -> Option<io::Error> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Writer that records the first failure, including failures hit while the encoder is dropped.
///
/// Both the GIF encoder and `BufWriter` discard errors from the trailer write and final flush.
struct TrackedWriter<W> {
    inner: W,
    errors: WriteErrorSlot,
}

impl<W> TrackedWriter<W> {
    fn new(inner: W, errors: WriteErrorSlot) -> Self {
        Self { inner, errors }
    }

    fn check<T>(&self, res: io::Result<T>) -> io::Result<T> {
        match res {
            Err(e) if e.kind() != io::ErrorKind::Interrupted => Err(self.errors.record(e)),
            other => other,
        }
    }
}

impl<W: Write> Write for TrackedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res = self.inner.write(buf);
        self.check(res)
    }

    fn flush(&mut self) -> io::Result<()> {
        let res = self.inner.flush();
        self.check(res)
    }
}

/// Drop `encoder`, which writes the trailer and flushes, then report any write error it hit.
fn finish_encoder<W: Write>(
    encoder: GifEncoder<BufWriter<TrackedWriter<W>>>,
    errors: &WriteErrorSlot,
) -> io::Result<()> {
    drop(encoder);
    match errors.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Destination for a base name: `.gif` is appended unless already present.
///
/// `movie` becomes `movie.gif`, `movie.v2` becomes `movie.v2.gif`, `Movie.GIF` is unchanged.
pub fn gif_output_path(save_to: &Path) -> PathBuf {
    let has_gif_ext = save_to
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if has_gif_ext {
        return save_to.to_path_buf();
    }
    let mut name = save_to.as_os_str().to_os_string();
    name.push(".gif");
    PathBuf::from(name)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GifMakerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn create_output(path: &Path, overwrite: bool) -> GifMakerResult<File> {
    if overwrite {
        return Ok(File::create(path)
            .with_context(|| format!("failed to create '{}'", path.display()))?);
    }
    match File::create_new(path) {
        Ok(f) => Ok(f),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(
            GifMakerError::validation(format!("output file '{}' already exists", path.display())),
        ),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("failed to create '{}'", path.display()))
            .into()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
