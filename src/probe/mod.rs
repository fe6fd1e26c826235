//! Probe data model
//!
//! Immutable snapshot of a media file's container and per-stream metadata as
//! reported by the prober. One `ProbeResult` is owned by one evaluation pass
//! and never mutated. Stream indices are container stream indices: unique and
//! equal to the descriptor's position in the original stream order.

pub mod ffprobe;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NormError, NormResult};

pub use ffprobe::{FfprobeSource, ProbeSource};

/// Stream kind as reported by the prober
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Attachment,
    Data,
    #[serde(other)]
    Unknown,
}

impl CodecType {
    /// Map an ffprobe `codec_type` string; unrecognized kinds are `Unknown`
    /// rather than an error so that exotic streams still get classified
    /// (they count as attachments for policy purposes).
    pub fn parse(value: &str) -> Self {
        match value {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            "attachment" => CodecType::Attachment,
            "data" => CodecType::Data,
            _ => CodecType::Unknown,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Attachment => "attachment",
            CodecType::Data => "data",
            CodecType::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One stream of the probed container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Container stream index (position in the pre-filter stream order)
    pub index: usize,
    pub codec_type: CodecType,
    pub codec_name: String,
    /// Raw stream tags, key-cased as the container stores them
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl StreamDescriptor {
    pub fn new(index: usize, codec_type: CodecType, codec_name: impl Into<String>) -> Self {
        Self {
            index,
            codec_type,
            codec_name: codec_name.into(),
            tags: HashMap::new(),
        }
    }

    /// Builder-style tag attachment, mostly for fixtures
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// True when every tag key is in the allowed set
    pub fn tags_subset_of(&self, allowed: &[String]) -> bool {
        self.tags.keys().all(|k| allowed.iter().any(|a| a == k))
    }
}

/// Opaque chapter marker; policy only cares whether any exist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Probed metadata for one media file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Streams in container order
    pub streams: Vec<StreamDescriptor>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    /// Lower-cased container extension of the source file, without the dot
    pub container_extension: String,
    /// Total duration, when the prober reported one; feeds progress parsing
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

impl ProbeResult {
    pub fn new(streams: Vec<StreamDescriptor>, container_extension: impl Into<String>) -> Self {
        Self {
            streams,
            chapters: Vec::new(),
            container_extension: container_extension.into(),
            duration_seconds: None,
        }
    }

    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Stream at container position 0
    pub fn leading_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.first()
    }

    /// Stream at container position 1
    pub fn second_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.get(1)
    }

    /// First stream of type video, in container order
    pub fn first_video_stream(&self) -> Option<&StreamDescriptor> {
        self.streams
            .iter()
            .find(|s| s.codec_type == CodecType::Video)
    }

    pub fn video_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| s.codec_type == CodecType::Video)
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| s.codec_type == CodecType::Audio)
    }

    /// Reject probes the policy cannot reason about. An empty stream list or
    /// a file without any video stream is missing-data, not a policy
    /// outcome.
    pub fn validate(&self) -> NormResult<()> {
        if self.streams.is_empty() {
            return Err(NormError::malformed_probe("probe reported no streams"));
        }
        if self.first_video_stream().is_none() {
            return Err(NormError::malformed_probe("probe reported no video stream"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_with(streams: Vec<StreamDescriptor>) -> ProbeResult {
        ProbeResult::new(streams, "mkv")
    }

    #[test]
    fn codec_type_parse_covers_ffprobe_kinds() {
        assert_eq!(CodecType::parse("video"), CodecType::Video);
        assert_eq!(CodecType::parse("audio"), CodecType::Audio);
        assert_eq!(CodecType::parse("subtitle"), CodecType::Subtitle);
        assert_eq!(CodecType::parse("attachment"), CodecType::Attachment);
        assert_eq!(CodecType::parse("data"), CodecType::Data);
        assert_eq!(CodecType::parse("sidecar"), CodecType::Unknown);
    }

    #[test]
    fn accessors_are_bounds_checked() {
        let probe = probe_with(vec![StreamDescriptor::new(0, CodecType::Video, "h264")]);
        assert!(probe.leading_stream().is_some());
        assert!(probe.second_stream().is_none());

        let empty = probe_with(vec![]);
        assert!(empty.leading_stream().is_none());
        assert!(empty.first_video_stream().is_none());
    }

    #[test]
    fn first_video_stream_skips_non_video() {
        let probe = probe_with(vec![
            StreamDescriptor::new(0, CodecType::Audio, "ac3"),
            StreamDescriptor::new(1, CodecType::Subtitle, "subrip"),
            StreamDescriptor::new(2, CodecType::Video, "h264"),
        ]);
        assert_eq!(probe.first_video_stream().map(|s| s.index), Some(2));
    }

    #[test]
    fn validate_rejects_empty_and_videoless_probes() {
        assert!(matches!(
            probe_with(vec![]).validate(),
            Err(NormError::MalformedProbe { .. })
        ));

        let audio_only = probe_with(vec![StreamDescriptor::new(0, CodecType::Audio, "aac")]);
        assert!(matches!(
            audio_only.validate(),
            Err(NormError::MalformedProbe { .. })
        ));

        let ok = probe_with(vec![StreamDescriptor::new(0, CodecType::Video, "h264")]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn tag_subset_check_is_key_based() {
        let allowed: Vec<String> = ["language", "DURATION", "ENCODER"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let clean = StreamDescriptor::new(0, CodecType::Video, "h264")
            .with_tag("language", "eng")
            .with_tag("DURATION", "00:42:00");
        assert!(clean.tags_subset_of(&allowed));

        let dirty = StreamDescriptor::new(0, CodecType::Video, "h264")
            .with_tag("language", "eng")
            .with_tag("title", "Episode 1");
        assert!(!dirty.tags_subset_of(&allowed));

        let untagged = StreamDescriptor::new(0, CodecType::Video, "h264");
        assert!(untagged.tags_subset_of(&allowed));
    }
}
