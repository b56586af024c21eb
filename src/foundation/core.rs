use std::time::Duration;

use crate::foundation::error::{GifMakerError, GifMakerResult};

/// Zero-based position of a frame in the output animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The index that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Uniform delay between displayed frames.
///
/// Always strictly positive and finite. GIF stores delays in 10 ms units, so the codec
/// rounds anything finer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameDelay(Duration);

impl FrameDelay {
    /// GIF delay granularity.
    pub const GIF_TICK: Duration = Duration::from_millis(10);

    /// Build a delay from a number of seconds.
    pub fn from_secs_f64(secs: f64) -> GifMakerResult<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(GifMakerError::validation(format!(
                "delay must be a positive number of seconds, got {secs}"
            )));
        }
        let d = Duration::try_from_secs_f64(secs)
            .map_err(|e| GifMakerError::validation(format!("delay {secs}s out of range: {e}")))?;
        Self::new(d)
    }

    /// Build a delay from a duration.
    pub fn new(d: Duration) -> GifMakerResult<Self> {
        if d.is_zero() {
            return Err(GifMakerError::validation("delay must be non-zero"));
        }
        Ok(Self(d))
    }

    /// The delay as a duration.
    pub fn as_duration(self) -> Duration {
        self.0
    }

    /// The delay in seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// `true` when the delay is representable exactly in GIF ticks.
    pub fn is_gif_exact(self) -> bool {
        self.0.as_nanos() % Self::GIF_TICK.as_nanos() == 0
    }

    /// Nearest whole number of GIF ticks, never less than one.
    pub fn round_to_gif_tick(self) -> Self {
        let tick = Self::GIF_TICK.as_nanos();
        let ticks = ((self.0.as_nanos() + tick / 2) / tick).max(1);
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        Self(Self::GIF_TICK.saturating_mul(ticks))
    }

    /// Delay in the form the `image` animation API expects, rounded to whole milliseconds.
    pub fn to_image_delay(self) -> image::Delay {
        let ms = (self.0.as_nanos() + 500_000) / 1_000_000;
        let ms = u32::try_from(ms).unwrap_or(u32::MAX).max(1);
        image::Delay::from_numer_denom_ms(ms, 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
