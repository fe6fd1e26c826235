//! Normalization policy engine
//!
//! One ordered rule ladder classifies a probed file against the normalized
//! form (leading h264 video, ac3 first audio, no subtitles, attachments,
//! extra metadata or chapters, mkv container) and, in the same pass, derives
//! the transcode plan that fixes the first defect found. Classification and
//! command building can therefore never drift apart.
//!
//! Evaluation is a pure function of the probe and the configuration: no
//! I/O, no shared state, safe to run concurrently for different files.

pub mod rules;

use serde::Serialize;
use tracing::debug;

use crate::command::{AudioDirective, TranscodePlan, VideoDirective, VideoMapping};
use crate::config::PluginConfig;
use crate::error::NormResult;
use crate::probe::ProbeResult;

/// First disqualifying finding, in ladder priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Stream 0 is not a video stream
    NonLeadingVideoStream,
    /// Stream 1 is audio but not ac3
    FirstAudioNotAc3,
    /// Some video stream is not h264
    VideoNotH264,
    /// Chapter markers present (configurable rule)
    HasChapters,
    /// A subtitle stream exists
    HasSubtitles,
    /// A stream that is neither audio, video nor subtitle exists
    HasAttachment,
    /// An audio/video stream carries tags outside the allowed set
    HasUnwantedMetadata,
    /// Container is not mkv
    WrongContainer,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::NonLeadingVideoStream => "non_leading_video_stream",
            Reason::FirstAudioNotAc3 => "first_audio_not_ac3",
            Reason::VideoNotH264 => "video_not_h264",
            Reason::HasChapters => "has_chapters",
            Reason::HasSubtitles => "has_subtitles",
            Reason::HasAttachment => "has_attachment",
            Reason::HasUnwantedMetadata => "has_unwanted_metadata",
            Reason::WrongContainer => "wrong_container",
        }
    }
}

/// Named findings accumulated during one evaluation pass. Built fresh per
/// file, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationFlags {
    pub non_h264: bool,
    pub non_leading_video_stream: bool,
    /// Container index of the first video stream, when stream 0 is not video
    pub first_video_index: Option<usize>,
    pub first_audio_not_ac3: bool,
    pub has_chapters: bool,
    pub has_subtitles: bool,
    pub has_attachment: bool,
    pub has_unwanted_metadata: bool,
    /// Container index of the stream the positional scan tripped on
    pub offending_stream_index: Option<usize>,
    pub wrong_container: bool,
}

impl ClassificationFlags {
    pub fn is_empty(&self) -> bool {
        !(self.non_h264
            || self.non_leading_video_stream
            || self.first_audio_not_ac3
            || self.has_chapters
            || self.has_subtitles
            || self.has_attachment
            || self.has_unwanted_metadata
            || self.wrong_container)
    }
}

/// Classification outcome: at most one reason, first match wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub needs_processing: bool,
    pub reason: Option<Reason>,
}

impl Decision {
    fn from_reason(reason: Option<Reason>) -> Self {
        Self {
            needs_processing: reason.is_some(),
            reason,
        }
    }
}

/// Result of one evaluation pass: the findings, the queue decision and the
/// transcode plan, all derived from the same ladder walk
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub flags: ClassificationFlags,
    pub decision: Decision,
    pub plan: TranscodePlan,
}

/// Walk the rule ladder once. Fails with `MalformedProbe` when the probe has
/// no streams or no video stream at all.
pub fn evaluate(probe: &ProbeResult, config: &PluginConfig) -> NormResult<Evaluation> {
    probe.validate()?;

    let mut flags = ClassificationFlags {
        non_h264: rules::has_non_h264_video(probe),
        ..ClassificationFlags::default()
    };

    let video = if flags.non_h264 {
        VideoDirective::EncodeH264
    } else {
        VideoDirective::Copy
    };

    // Ladder order matches the command-building ladder of the upstream
    // preset, which is the superset of its classification ladder.
    let reason = if let Some(index) = rules::non_leading_video(probe) {
        flags.non_leading_video_stream = true;
        flags.first_video_index = Some(index);
        Some(Reason::NonLeadingVideoStream)
    } else if rules::first_audio_not_ac3(probe) {
        flags.first_audio_not_ac3 = true;
        Some(Reason::FirstAudioNotAc3)
    } else if flags.non_h264 {
        Some(Reason::VideoNotH264)
    } else if config.chapters_trigger && !probe.chapters.is_empty() {
        flags.has_chapters = true;
        Some(Reason::HasChapters)
    } else if let Some((scan_reason, index)) = rules::scan_streams(probe, config) {
        flags.offending_stream_index = Some(index);
        match scan_reason {
            Reason::HasSubtitles => flags.has_subtitles = true,
            Reason::HasAttachment => flags.has_attachment = true,
            Reason::HasUnwantedMetadata => flags.has_unwanted_metadata = true,
            _ => {}
        }
        Some(scan_reason)
    } else if rules::wrong_container(probe) {
        flags.wrong_container = true;
        Some(Reason::WrongContainer)
    } else {
        None
    };

    let plan = plan_for(reason, &flags, video);

    match reason {
        Some(r) => debug!("needs processing: {}", r.as_str()),
        None => debug!("already normalized, nothing to do"),
    }

    Ok(Evaluation {
        flags,
        decision: Decision::from_reason(reason),
        plan,
    })
}

/// Map the fired rule to the command shape that repairs it
fn plan_for(
    reason: Option<Reason>,
    flags: &ClassificationFlags,
    video: VideoDirective,
) -> TranscodePlan {
    match reason {
        None => TranscodePlan::NoOp,
        Some(Reason::WrongContainer) => TranscodePlan::Remux,
        Some(Reason::NonLeadingVideoStream) => TranscodePlan::Normalize {
            // flags.first_video_index is always set when this rule fires;
            // fall back to the first-video specifier rather than panicking
            video_mapping: flags
                .first_video_index
                .map(VideoMapping::ByIndex)
                .unwrap_or(VideoMapping::FirstVideo),
            video,
            audio: AudioDirective::CopyAll,
        },
        Some(Reason::FirstAudioNotAc3) => TranscodePlan::Normalize {
            video_mapping: VideoMapping::FirstVideo,
            video,
            audio: AudioDirective::TranscodeFirstToAc3,
        },
        // Non-h264 video, chapters, subtitles, attachments and unwanted
        // metadata all take the generic normalizing command
        Some(_) => TranscodePlan::Normalize {
            video_mapping: VideoMapping::FirstVideo,
            video,
            audio: AudioDirective::CopyAll,
        },
    }
}
