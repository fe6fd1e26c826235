//! Transcode command description
//!
//! A `TranscodePlan` is the policy engine's statement of *what* has to happen
//! to a file; rendering it against concrete input/output paths produces the
//! `ExecCommand` the host runs. Every normalizing command maps exactly one
//! video stream, drops subtitles and strips global metadata and chapters;
//! a remux copies all streams into an mkv container untouched.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// How the single output video stream is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VideoDirective {
    /// Source video is already h264
    Copy,
    /// Re-encode to h264 via libx264
    EncodeH264,
}

impl VideoDirective {
    fn codec_arg(&self) -> &'static str {
        match self {
            VideoDirective::Copy => "copy",
            VideoDirective::EncodeH264 => "libx264",
        }
    }
}

/// Which input stream becomes the output video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VideoMapping {
    /// The container's first video stream (`0:v:0`)
    FirstVideo,
    /// An explicit container stream index, used when the leading stream is
    /// not video
    ByIndex(usize),
}

impl VideoMapping {
    fn specifier(&self) -> String {
        match self {
            VideoMapping::FirstVideo => "0:v:0".to_string(),
            VideoMapping::ByIndex(index) => format!("0:{}", index),
        }
    }
}

/// How audio streams are carried over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AudioDirective {
    /// All audio tracks copied verbatim
    CopyAll,
    /// First audio track re-encoded to ac3, the rest copied verbatim
    TranscodeFirstToAc3,
}

/// What the worker should do with the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TranscodePlan {
    /// Full normalization: one video stream, audio per directive, subtitles
    /// dropped, metadata and chapters stripped
    Normalize {
        video_mapping: VideoMapping,
        video: VideoDirective,
        audio: AudioDirective,
    },
    /// Container is the only defect: copy every stream into mkv
    Remux,
    /// File is already normalized; no command is emitted
    NoOp,
}

impl TranscodePlan {
    pub fn is_noop(&self) -> bool {
        matches!(self, TranscodePlan::NoOp)
    }

    /// Render the plan into an executable command, or `None` for `NoOp`
    pub fn exec_command(&self, file_in: &Path, file_out: &Path) -> Option<ExecCommand> {
        let mut args: Vec<String> = vec!["-y".into(), "-nostdin".into(), "-i".into()];
        args.push(file_in.to_string_lossy().into_owned());

        match self {
            TranscodePlan::NoOp => return None,
            TranscodePlan::Remux => {
                args.extend(["-c".into(), "copy".into()]);
            }
            TranscodePlan::Normalize {
                video_mapping,
                video,
                audio,
            } => {
                args.extend(["-map".into(), video_mapping.specifier()]);
                args.extend(["-c:v:0".into(), video.codec_arg().into()]);
                args.extend(["-map".into(), "0:a".into(), "-c:a".into(), "copy".into()]);
                if *audio == AudioDirective::TranscodeFirstToAc3 {
                    // Overrides the blanket copy for the first audio track only
                    args.extend(["-c:a:0".into(), "ac3".into()]);
                }
                args.push("-sn".into());
                args.extend(["-map_metadata".into(), "-1".into()]);
                args.extend(["-map_chapters".into(), "-1".into()]);
            }
        }

        args.push(file_out.to_string_lossy().into_owned());
        Some(ExecCommand {
            program: "ffmpeg".to_string(),
            args,
        })
    }
}

/// Program plus ordered argument list for the host to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for ExecCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
