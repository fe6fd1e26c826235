//! FFprobe adapter for media file probing
//!
//! The prober is an external collaborator; this adapter shells out to
//! `ffprobe`, parses its JSON report and converts it into the engine's
//! `ProbeResult`. Prober failures (missing binary, unreadable or non-video
//! input) surface as `ProbeUnavailable` so the policy never sees a partial
//! probe.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::{NormError, NormResult};
use crate::probe::{Chapter, CodecType, ProbeResult, StreamDescriptor};

/// Port for media file probing
#[async_trait]
pub trait ProbeSource: Send + Sync {
    /// Probe one media file
    async fn probe(&self, path: &Path) -> NormResult<ProbeResult>;
}

/// FFprobe-based probe source
pub struct FfprobeSource {
    binary: String,
}

impl FfprobeSource {
    pub fn new() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }

    /// Override the ffprobe binary path
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbeSource for FfprobeSource {
    async fn probe(&self, path: &Path) -> NormResult<ProbeResult> {
        let path_str = path.to_string_lossy();
        debug!("probing {}", path_str);

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_streams",
                "-show_chapters",
                "-show_format",
                "-of",
                "json",
            ])
            .arg(path.as_os_str())
            .output()
            .await
            .map_err(|e| NormError::probe_unavailable(format!("failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NormError::probe_unavailable(format!(
                "ffprobe failed for {}: {}",
                path_str,
                stderr.trim()
            )));
        }

        let raw: RawProbe = serde_json::from_slice(&output.stdout)?;
        Ok(convert(raw, path))
    }
}

/// Convert a raw ffprobe report into the engine's model
fn convert(raw: RawProbe, path: &Path) -> ProbeResult {
    let streams = raw
        .streams
        .into_iter()
        .map(|s| StreamDescriptor {
            index: s.index,
            codec_type: CodecType::parse(s.codec_type.as_deref().unwrap_or("")),
            codec_name: s.codec_name.unwrap_or_else(|| "unknown".to_string()),
            tags: s.tags.unwrap_or_default(),
        })
        .collect();

    let chapters = raw
        .chapters
        .into_iter()
        .map(|c| Chapter {
            id: c.id,
            title: c.tags.and_then(|t| t.title),
        })
        .collect();

    let duration_seconds = raw
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());

    let container_extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    ProbeResult {
        streams,
        chapters,
        container_extension,
        duration_seconds,
    }
}

// JSON deserialization structures

#[derive(Debug, Deserialize)]
struct RawProbe {
    #[serde(default)]
    streams: Vec<RawStream>,
    #[serde(default)]
    chapters: Vec<RawChapter>,
    format: Option<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawChapter {
    id: i64,
    tags: Option<RawChapterTags>,
}

#[derive(Debug, Deserialize)]
struct RawChapterTags {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    duration: Option<String>,
}
