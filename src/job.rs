use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    collect::collector::{CollectOpts, FrameCollector},
    collect::listing::{DirLister, FsLister},
    encode::gif::{GifSinkOpts, gif_output_path},
    foundation::core::FrameDelay,
    foundation::error::{GifMakerError, GifMakerResult},
    pipeline::{EncodeStats, encode_gif},
};

/// One invocation: where the frames live, how fast to play them, where to write.
///
/// Serialized as the JSON job file accepted by `gifmaker make --job`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GifJob {
    /// Root folders, in concatenation order.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Delay between frames, in seconds.
    pub delay_secs: f64,
    /// Output base name; `.gif` is appended unless present.
    pub save_to: PathBuf,
    /// Recognized frame extensions.
    #[serde(default = "GifJob::default_extensions")]
    pub extensions: Vec<String>,
    /// Overwrite an existing output.
    #[serde(default = "GifJob::default_overwrite")]
    pub overwrite: bool,
    /// Keep a partially written output when encoding fails.
    #[serde(default)]
    pub keep_partial: bool,
    /// Loop count; `None` loops forever.
    #[serde(default)]
    pub loops: Option<u16>,
}

/// What a completed job produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MakeReport {
    /// File that was written.
    pub out_path: PathBuf,
    /// Frames in the order they were encoded.
    pub frames: Vec<PathBuf>,
    /// Encoder counters.
    pub stats: EncodeStats,
}

impl GifJob {
    fn default_extensions() -> Vec<String> {
        vec![CollectOpts::DEFAULT_EXTENSION.to_string()]
    }

    const fn default_overwrite() -> bool {
        true
    }

    /// A job with default options.
    pub fn new(roots: Vec<PathBuf>, delay_secs: f64, save_to: impl Into<PathBuf>) -> Self {
        Self {
            roots,
            delay_secs,
            save_to: save_to.into(),
            extensions: Self::default_extensions(),
            overwrite: Self::default_overwrite(),
            keep_partial: false,
            loops: None,
        }
    }

    /// Load a job from a JSON file.
    pub fn from_path(path: &Path) -> GifMakerResult<Self> {
        let f = File::open(path).with_context(|| format!("open job file '{}'", path.display()))?;
        let job = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse job file '{}'", path.display()))?;
        Ok(job)
    }

    /// Check option values without touching the filesystem.
    pub fn validate(&self) -> GifMakerResult<()> {
        if self.roots.is_empty() {
            return Err(GifMakerError::validation("at least one root folder is required"));
        }
        self.delay()?;
        if self.save_to.as_os_str().is_empty() {
            return Err(GifMakerError::validation("save_to must be non-empty"));
        }
        self.collect_opts().validate()
    }

    /// Validated frame delay.
    pub fn delay(&self) -> GifMakerResult<FrameDelay> {
        FrameDelay::from_secs_f64(self.delay_secs)
    }

    /// Collector options derived from this job.
    pub fn collect_opts(&self) -> CollectOpts {
        CollectOpts::with_extensions(&self.extensions)
    }

    /// Final output path.
    pub fn out_path(&self) -> PathBuf {
        gif_output_path(&self.save_to)
    }

    /// Sink options derived from this job.
    pub fn sink_opts(&self) -> GifSinkOpts {
        GifSinkOpts {
            overwrite: self.overwrite,
            keep_partial: self.keep_partial,
            loops: self.loops,
            ..GifSinkOpts::new(self.out_path())
        }
    }

    /// Collect the ordered frames for this job without decoding anything.
    pub fn collect(&self) -> GifMakerResult<Vec<PathBuf>> {
        self.collect_with(FsLister)
    }

    /// Like [`GifJob::collect`] over a custom lister.
    pub fn collect_with<L: DirLister>(&self, lister: L) -> GifMakerResult<Vec<PathBuf>> {
        FrameCollector::new(lister, self.collect_opts()).collect(&self.roots)
    }

    /// Collect, decode and encode.
    #[tracing::instrument(skip(self), fields(roots = self.roots.len(), out = %self.out_path().display()))]
    pub fn run(&self) -> GifMakerResult<MakeReport> {
        self.validate()?;
        let delay = self.delay()?;
        let frames = self.collect()?;
        let opts = self.sink_opts();
        let stats = encode_gif(&frames, delay, &opts)?;
        Ok(MakeReport {
            out_path: opts.out_path,
            frames,
            stats,
        })
    }
}

/// Run a job end to end.
pub fn make_gif(job: &GifJob) -> GifMakerResult<MakeReport> {
    job.run()
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
