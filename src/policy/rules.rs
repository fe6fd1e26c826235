//! Individual policy checks
//!
//! Each check is a pure predicate over the probe; `evaluate` in the parent
//! module orders them into the rule ladder. Stream access here is always
//! bounds-checked.

use tracing::debug;

use crate::config::PluginConfig;
use crate::policy::Reason;
use crate::probe::{CodecType, ProbeResult};

/// Some video stream is not h264. Feeds the video codec directive and the
/// `VideoNotH264` rule.
pub fn has_non_h264_video(probe: &ProbeResult) -> bool {
    probe.video_streams().any(|s| s.codec_name != "h264")
}

/// The leading container stream is not video. Returns the index of the
/// actual first video stream when the check fires.
pub fn non_leading_video(probe: &ProbeResult) -> Option<usize> {
    match probe.leading_stream() {
        Some(s) if s.codec_type == CodecType::Video => None,
        _ => probe.first_video_stream().map(|s| s.index),
    }
}

/// Stream 1 exists, is audio, and is not ac3. A missing or non-audio second
/// stream does not fire this rule; those shapes are caught elsewhere.
pub fn first_audio_not_ac3(probe: &ProbeResult) -> bool {
    probe
        .second_stream()
        .map(|s| s.codec_type == CodecType::Audio && s.codec_name != "ac3")
        .unwrap_or(false)
}

/// Positional scan over all streams. The first offending stream in container
/// order decides which finding is reported: subtitles, an attachment-like
/// stream, or disallowed tags on an audio/video stream. Returns the reason
/// and the offending stream index.
pub fn scan_streams(probe: &ProbeResult, config: &PluginConfig) -> Option<(Reason, usize)> {
    for stream in &probe.streams {
        match stream.codec_type {
            CodecType::Subtitle => {
                debug!("stream {} is a subtitle stream", stream.index);
                return Some((Reason::HasSubtitles, stream.index));
            }
            CodecType::Video | CodecType::Audio => {
                if !stream.tags_subset_of(&config.allowed_tags) {
                    debug!("stream {} carries unwanted metadata", stream.index);
                    return Some((Reason::HasUnwantedMetadata, stream.index));
                }
            }
            // attachment, data or anything the prober could not name
            _ => {
                debug!(
                    "stream {} is neither audio nor video ({})",
                    stream.index, stream.codec_type
                );
                return Some((Reason::HasAttachment, stream.index));
            }
        }
    }
    None
}

/// Container extension is not mkv
pub fn wrong_container(probe: &ProbeResult) -> bool {
    probe.container_extension != "mkv"
}
