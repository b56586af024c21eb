//! gifmaker assembles an animated GIF from a directory tree of still frames.
//!
//! # Pipeline overview
//!
//! 1. **Collect**: `roots -> Vec<PathBuf>` via [`FrameCollector`]. Every directory must hold
//!    only sub-directories or only frame files; frames come back in lexicographic depth-first
//!    order, roots concatenated in the order given.
//! 2. **Decode**: each path is decoded lazily by [`DecodedFrames`] into a [`FrameRGBA`].
//! 3. **Encode**: frames stream into a [`FrameSink`]; [`GifSink`] writes the output file with a
//!    uniform [`FrameDelay`].
//!
//! [`GifJob`] ties the steps together and is what the `gifmaker` binary drives.
//!
//! Execution is single-threaded and sequential. The sink owns the output writer and releases
//! it on every exit path; on failure the partial file is removed unless asked otherwise.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod collect;
mod encode;
mod foundation;
mod job;
mod pipeline;

pub use assets::FrameRGBA;
pub use assets::decode::{DecodedFrames, decode_frame};
pub use collect::collector::{CollectOpts, FrameCollector, collect_frames};
pub use collect::listing::{DirEntryInfo, DirLister, FsLister, MemoryLister};
pub use encode::gif::{GifSink, GifSinkOpts, ensure_parent_dir, gif_output_path};
pub use encode::sink::{EncodeState, FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{FrameDelay, FrameIndex};
pub use foundation::error::{GifMakerError, GifMakerResult};
pub use job::{GifJob, MakeReport, make_gif};
pub use pipeline::{EncodeStats, encode_frames, encode_gif, encode_stream};
