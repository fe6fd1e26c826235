//! Worker progress parsing
//!
//! The host tails the transcoder's output and feeds each line to a parser
//! bound to the probed duration of the source file. ffmpeg reports the
//! current position as `time=HH:MM:SS.cc` on its status lines; position over
//! duration gives the percentage.

/// Parses ffmpeg status output into a completion percentage
#[derive(Debug, Clone, Copy)]
pub struct ProgressParser {
    duration_seconds: Option<f64>,
}

impl ProgressParser {
    pub fn new(duration_seconds: Option<f64>) -> Self {
        Self { duration_seconds }
    }

    /// Percentage (0.0..=100.0) for one output line, or `None` when the line
    /// carries no position report or the source duration is unknown
    pub fn parse_line(&self, line: &str) -> Option<f64> {
        let duration = self.duration_seconds.filter(|d| *d > 0.0)?;
        let position = Self::extract_time(line)?;
        Some((position / duration * 100.0).clamp(0.0, 100.0))
    }

    /// Pull the `time=` timestamp out of an ffmpeg status line
    fn extract_time(line: &str) -> Option<f64> {
        let start = line.find("time=")? + "time=".len();
        let rest = &line[start..];
        let token = rest.split_whitespace().next()?;
        Self::parse_timestamp(token)
    }

    /// `HH:MM:SS.cc` to seconds
    fn parse_timestamp(token: &str) -> Option<f64> {
        let mut parts = token.split(':');
        let hours: f64 = parts.next()?.parse().ok()?;
        let minutes: f64 = parts.next()?.parse().ok()?;
        let seconds: f64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    }
}
