use std::path::PathBuf;

use crate::{
    assets::{FrameRGBA, decode::DecodedFrames},
    encode::gif::{GifSink, GifSinkOpts},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{FrameDelay, FrameIndex},
    foundation::error::{GifMakerError, GifMakerResult},
};

/// Counters reported by a finished encode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Frames handed to the sink.
    pub frames_written: u64,
}

/// Decode `frames` in order and stream them into `sink`.
///
/// An empty list is rejected with [`GifMakerError::EmptyInput`] before the sink is started.
/// Any decode or write failure aborts the sink and is returned.
pub fn encode_frames(
    frames: &[PathBuf],
    delay: FrameDelay,
    sink: &mut dyn FrameSink,
) -> GifMakerResult<EncodeStats> {
    if frames.is_empty() {
        return Err(GifMakerError::EmptyInput);
    }
    let cfg = SinkConfig {
        delay,
        frame_count: frames.len(),
    };
    encode_stream(DecodedFrames::new(frames), cfg, sink)
}

/// Decode `frames` in order and write them as a GIF described by `opts`.
#[tracing::instrument(skip(frames, opts), fields(frames = frames.len(), out = %opts.out_path.display()))]
pub fn encode_gif(
    frames: &[PathBuf],
    delay: FrameDelay,
    opts: &GifSinkOpts,
) -> GifMakerResult<EncodeStats> {
    let mut sink = GifSink::new(opts.clone());
    encode_frames(frames, delay, &mut sink)
}

/// Drive an already-decoded stream into `sink`.
///
/// The sink is released on every exit path: `end` on success, `abort` on failure.
pub fn encode_stream<I>(
    frames: I,
    cfg: SinkConfig,
    sink: &mut dyn FrameSink,
) -> GifMakerResult<EncodeStats>
where
    I: IntoIterator<Item = GifMakerResult<(FrameIndex, FrameRGBA)>>,
{
    match drive(frames, cfg, sink) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            if let Err(abort_err) = sink.abort() {
                tracing::error!(error = %abort_err, "failed to release sink after error");
            }
            Err(err)
        }
    }
}

fn drive<I>(frames: I, cfg: SinkConfig, sink: &mut dyn FrameSink) -> GifMakerResult<EncodeStats>
where
    I: IntoIterator<Item = GifMakerResult<(FrameIndex, FrameRGBA)>>,
{
    sink.begin(cfg)?;

    let mut stats = EncodeStats::default();
    for item in frames {
        let (idx, frame) = item?;
        sink.push_frame(idx, frame)?;
        stats.frames_written += 1;
    }
    if stats.frames_written == 0 {
        return Err(GifMakerError::EmptyInput);
    }

    sink.end()?;
    Ok(stats)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
