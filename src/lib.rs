//! tvnorm - normalization policy engine for TV library files
//!
//! Classifies probed media files against a single normalized form (leading
//! h264 video, ac3 first audio, no subtitles or attachments, stripped
//! metadata and chapters, mkv container) and builds the ffmpeg command that
//! produces that form. One ordered rule ladder drives both the yes/no
//! classification and the command construction, so the two can never
//! disagree about a file.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod hooks;
pub mod policy;
pub mod probe;
pub mod progress;
pub mod utils;

pub use command::{AudioDirective, ExecCommand, TranscodePlan, VideoDirective, VideoMapping};
pub use config::PluginConfig;
pub use error::{NormError, NormResult};
pub use policy::{evaluate, ClassificationFlags, Decision, Evaluation, Reason};
pub use probe::{Chapter, CodecType, ProbeResult, StreamDescriptor};
