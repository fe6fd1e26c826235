//! Host lifecycle hooks
//!
//! The automation host drives a plugin through three runner hooks: a library
//! file test (should this file be queued?), a worker stage (what command
//! should run?) and a post-processor stage (where does the output go?). The
//! hooks here are thin shells over the policy engine; the evaluation made at
//! file-test time travels to the later hooks inside an explicit
//! `FileContext` instead of an ambient shared dictionary.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::command::ExecCommand;
use crate::config::PluginConfig;
use crate::error::NormResult;
use crate::policy::{self, Evaluation};
use crate::probe::ProbeResult;
use crate::progress::ProgressParser;
use crate::utils::path::{extension_lowercase, in_optimized_tree, optimized_output_path};

/// Per-file state threaded across hook invocations for the same file
#[derive(Debug, Clone, Serialize)]
pub struct FileContext {
    pub source_path: PathBuf,
    /// Ladder result from the most recent evaluation of this file
    pub evaluation: Option<Evaluation>,
}

impl FileContext {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            evaluation: None,
        }
    }
}

/// Result of the library file-test hook
#[derive(Debug, Clone, Serialize)]
pub struct FileTestOutcome {
    /// Whether the host should add the file to its pending task queue
    pub add_to_pending_tasks: bool,
    pub context: FileContext,
}

impl FileTestOutcome {
    fn skip(context: FileContext) -> Self {
        Self {
            add_to_pending_tasks: false,
            context,
        }
    }
}

/// Check whether a file already has an optimized copy. Split out as a trait
/// so the filesystem probe can be stubbed in tests.
pub trait OptimizedMarker {
    fn is_optimized(&self, source: &Path) -> bool;
}

/// Filesystem-backed marker check: the file lives inside an optimized tree,
/// or its optimized counterpart already exists on disk
pub struct FsMarker;

impl OptimizedMarker for FsMarker {
    fn is_optimized(&self, source: &Path) -> bool {
        in_optimized_tree(source)
            || optimized_output_path(source)
                .map(|p| p.exists())
                .unwrap_or(false)
    }
}

/// Library file-test hook. `probe` is `None` when the prober rejected the
/// file; it then stays out of the queue and undecided, to be re-tested
/// later.
pub fn file_test(
    source_path: &Path,
    probe: Option<&ProbeResult>,
    marker: &dyn OptimizedMarker,
    config: &PluginConfig,
) -> NormResult<FileTestOutcome> {
    let context = FileContext::new(source_path);
    debug!("testing file {}", source_path.display());

    // Partial downloads are never queued
    if extension_lowercase(source_path).as_deref() == Some("part") {
        debug!("file extension is .part, skipping");
        return Ok(FileTestOutcome::skip(context));
    }

    let probe = match probe {
        Some(p) => p,
        None => {
            debug!("file could not be probed, leaving undecided");
            return Ok(FileTestOutcome::skip(context));
        }
    };

    if marker.is_optimized(source_path) {
        debug!("file already has an optimized copy, skipping");
        return Ok(FileTestOutcome::skip(context));
    }

    let evaluation = policy::evaluate(probe, config)?;
    let add = evaluation.decision.needs_processing;

    Ok(FileTestOutcome {
        add_to_pending_tasks: add,
        context: FileContext {
            source_path: source_path.to_path_buf(),
            evaluation: Some(evaluation),
        },
    })
}

/// Result of the worker hook
#[derive(Debug)]
pub struct WorkerOutcome {
    /// Command the host should execute, or `None` when the file turned out
    /// to be normalized after all
    pub exec_command: Option<ExecCommand>,
    /// Where the command writes its output (cache-directory resolved)
    pub file_out: PathBuf,
    /// Parser for the command's status output, bound to the probed duration
    pub progress: Option<ProgressParser>,
}

/// Worker hook. Reuses the file-test evaluation when the context carries
/// one, so classification and command construction always come from the
/// same ladder walk; otherwise evaluates fresh (the host may run workers on
/// files tested before a restart).
pub fn worker(
    context: &mut FileContext,
    probe: &ProbeResult,
    file_in: &Path,
    file_out: &Path,
    config: &PluginConfig,
) -> NormResult<WorkerOutcome> {
    debug!("processing file {}", context.source_path.display());

    let plan = match context.evaluation.as_ref() {
        Some(evaluation) => evaluation.plan,
        None => {
            let evaluation = policy::evaluate(probe, config)?;
            let plan = evaluation.plan;
            context.evaluation = Some(evaluation);
            plan
        }
    };

    let file_out = resolve_output_path(file_out, &context.source_path, config);
    let exec_command = plan.exec_command(file_in, &file_out);
    let progress = exec_command
        .as_ref()
        .map(|_| ProgressParser::new(probe.duration_seconds));

    if let Some(cmd) = &exec_command {
        debug!("exec command: {}", cmd);
    } else {
        debug!("no command emitted, file already normalized");
    }

    Ok(WorkerOutcome {
        exec_command,
        file_out,
        progress,
    })
}

/// The worker always produces mkv output. When a cache directory is
/// configured the intermediate file goes there under the source basename;
/// otherwise the host-provided output path is kept, extension corrected.
fn resolve_output_path(host_out: &Path, source: &Path, config: &PluginConfig) -> PathBuf {
    let mut out = match (&config.cache_dir, source.file_name()) {
        (Some(cache_dir), Some(name)) => cache_dir.join(name),
        _ => host_out.to_path_buf(),
    };
    out.set_extension("mkv");
    out
}

/// Result of the post-processor file-movement hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementPlan {
    pub remove_source_file: bool,
    pub copy_file: bool,
    pub run_default_file_copy: bool,
    pub destination: PathBuf,
}

/// Post-processor hook. Files whose video stream had to be re-encoded go
/// into the optimized-versions tree next to their show directory; files
/// that only needed remux/stream fixes replace themselves in place.
pub fn post_process(context: &FileContext) -> MovementPlan {
    let source = &context.source_path;
    let non_h264 = context
        .evaluation
        .as_ref()
        .map(|e| e.flags.non_h264)
        .unwrap_or(false);

    let destination = if non_h264 {
        debug!("video stream was re-encoded, routing to optimized tree");
        optimized_output_path(source).unwrap_or_else(|| source.clone())
    } else {
        source.clone()
    };

    MovementPlan {
        remove_source_file: false,
        copy_file: true,
        run_default_file_copy: false,
        destination,
    }
}
