//! Command implementations
//!
//! The CLI is a development surface: it probes with the ffprobe adapter and
//! runs the same hooks the automation host would, so policy behavior can be
//! inspected file by file without a host install.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;
use walkdir::WalkDir;

use crate::cli::{ClassifyArgs, PlanArgs, ScanArgs};
use crate::config::PluginConfig;
use crate::error::NormError;
use crate::hooks::{self, FileContext, FsMarker};
use crate::probe::{FfprobeSource, ProbeResult, ProbeSource};
use crate::utils::path::extension_lowercase;

/// Container extensions the scan command treats as video files
const VIDEO_EXTENSIONS: [&str; 9] = [
    "mkv", "mp4", "avi", "mov", "m4v", "ts", "mpg", "mpeg", "webm",
];

/// Probe one file, mapping prober rejection to `None`
async fn try_probe(source: &FfprobeSource, path: &Path) -> Result<Option<ProbeResult>> {
    match source.probe(path).await {
        Ok(probe) => Ok(Some(probe)),
        Err(NormError::ProbeUnavailable { reason }) => {
            warn!("{}", reason);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Execute the classify command
pub async fn classify(args: ClassifyArgs, config: &PluginConfig) -> Result<()> {
    let path = PathBuf::from(&args.input);
    let source = FfprobeSource::new();
    let probe = try_probe(&source, &path).await?;

    let outcome = hooks::file_test(&path, probe.as_ref(), &FsMarker, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome.context.evaluation {
        Some(e) => match e.decision.reason {
            Some(reason) => {
                println!("{}: needs processing ({})", path.display(), reason.as_str())
            }
            None => println!("{}: ok", path.display()),
        },
        None => println!("{}: skipped", path.display()),
    }

    Ok(())
}

/// Execute the plan command
pub async fn plan(args: PlanArgs, config: &PluginConfig) -> Result<()> {
    let path = PathBuf::from(&args.input);
    let source = FfprobeSource::new();

    let probe = match try_probe(&source, &path).await? {
        Some(probe) => probe,
        None => {
            println!("{}: unprobeable, no command", path.display());
            return Ok(());
        }
    };

    let host_out = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| path.with_extension("norm.mkv"));

    let mut context = FileContext::new(&path);
    let outcome = hooks::worker(&mut context, &probe, &path, &host_out, config)?;

    match outcome.exec_command {
        Some(cmd) => println!("{}", cmd),
        None => println!("{}: already normalized, no command", path.display()),
    }

    Ok(())
}

/// Execute the scan command
pub async fn scan(args: ScanArgs, config: &PluginConfig) -> Result<()> {
    let source = FfprobeSource::new();
    let mut queued = 0usize;
    let mut clean = 0usize;
    let mut skipped = 0usize;

    for entry in WalkDir::new(&args.root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_video = extension_lowercase(path)
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        let probe = try_probe(&source, path).await?;
        match hooks::file_test(path, probe.as_ref(), &FsMarker, config) {
            Ok(outcome) if outcome.add_to_pending_tasks => {
                let reason = outcome
                    .context
                    .evaluation
                    .as_ref()
                    .and_then(|e| e.decision.reason)
                    .map(|r| r.as_str())
                    .unwrap_or("unknown");
                println!("QUEUE  {}  ({})", path.display(), reason);
                queued += 1;
            }
            Ok(outcome) if outcome.context.evaluation.is_some() => {
                println!("OK     {}", path.display());
                clean += 1;
            }
            Ok(_) => {
                println!("SKIP   {}", path.display());
                skipped += 1;
            }
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    println!(
        "\n{} queued, {} normalized, {} skipped",
        queued, clean, skipped
    );
    Ok(())
}
