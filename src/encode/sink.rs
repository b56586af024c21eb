use crate::assets::FrameRGBA;
use crate::foundation::core::{FrameDelay, FrameIndex};
use crate::foundation::error::{GifMakerError, GifMakerResult};

/// Configuration provided to a [`FrameSink`] before any frames are pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Delay applied to every frame.
    pub delay: FrameDelay,
    /// Number of frames the caller intends to push.
    pub frame_count: usize,
}

/// Lifecycle of a sink's writer.
///
/// `Finalized` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeState {
    /// Nothing acquired yet.
    Idle,
    /// Writer open; `next` is the index the next pushed frame must carry.
    Writing {
        /// Expected index of the next frame.
        next: FrameIndex,
    },
    /// Output complete and writer released.
    Finalized,
    /// A step failed; the writer has been or will be released.
    Failed,
}

impl EncodeState {
    /// `true` for `Finalized` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }
}

/// Sink contract for consuming decoded frames in sequence order.
///
/// `push_frame` is called with consecutive indices starting at zero. After a failure the
/// driver calls `abort`, which must release the writer and be safe to call in any state.
pub trait FrameSink {
    /// Acquire the writer. Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GifMakerResult<()>;
    /// Append one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: FrameRGBA) -> GifMakerResult<()>;
    /// Finalize the output and release the writer.
    fn end(&mut self) -> GifMakerResult<()>;
    /// Release the writer after a failure.
    fn abort(&mut self) -> GifMakerResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    state: EncodeState,
    /// Frames in sequence order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self {
            cfg: None,
            state: EncodeState::Idle,
            frames: Vec::new(),
        }
    }
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EncodeState {
        self.state
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GifMakerResult<()> {
        if self.state != EncodeState::Idle {
            return Err(GifMakerError::validation(format!(
                "in-memory sink cannot begin from state {:?}",
                self.state
            )));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.state = EncodeState::Writing {
            next: FrameIndex(0),
        };
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: FrameRGBA) -> GifMakerResult<()> {
        let EncodeState::Writing { next } = self.state else {
            return Err(GifMakerError::validation(format!(
                "in-memory sink is not accepting frames in state {:?}",
                self.state
            )));
        };
        if idx != next {
            self.state = EncodeState::Failed;
            return Err(GifMakerError::validation(format!(
                "in-memory sink expected frame {} but received frame {}",
                next.0, idx.0
            )));
        }
        self.frames.push((idx, frame));
        self.state = EncodeState::Writing { next: idx.next() };
        Ok(())
    }

    fn end(&mut self) -> GifMakerResult<()> {
        if !matches!(self.state, EncodeState::Writing { .. }) {
            return Err(GifMakerError::validation(format!(
                "in-memory sink cannot finish from state {:?}",
                self.state
            )));
        }
        self.state = EncodeState::Finalized;
        Ok(())
    }

    fn abort(&mut self) -> GifMakerResult<()> {
        if self.state != EncodeState::Finalized {
            self.state = EncodeState::Failed;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
