//! End-to-end hook behavior: file test gating, worker command construction
//! and post-processor routing, exercised the way the automation host drives
//! them.

use std::fs;
use std::path::{Path, PathBuf};

use tvnorm::command::{AudioDirective, TranscodePlan, VideoDirective, VideoMapping};
use tvnorm::config::PluginConfig;
use tvnorm::hooks::{self, FileContext, FsMarker, OptimizedMarker};
use tvnorm::probe::{CodecType, ProbeResult, StreamDescriptor};

struct StubMarker(bool);

impl OptimizedMarker for StubMarker {
    fn is_optimized(&self, _source: &Path) -> bool {
        self.0
    }
}

fn normalized_probe() -> ProbeResult {
    ProbeResult::new(
        vec![
            StreamDescriptor::new(0, CodecType::Video, "h264"),
            StreamDescriptor::new(1, CodecType::Audio, "ac3"),
        ],
        "mkv",
    )
}

fn hevc_probe() -> ProbeResult {
    ProbeResult::new(
        vec![
            StreamDescriptor::new(0, CodecType::Video, "hevc"),
            StreamDescriptor::new(1, CodecType::Audio, "ac3"),
        ],
        "mkv",
    )
}

#[test]
fn part_files_are_never_queued() {
    let probe = hevc_probe();
    let outcome = hooks::file_test(
        Path::new("/library/Show/ep.mkv.part"),
        Some(&probe),
        &StubMarker(false),
        &PluginConfig::default(),
    )
    .unwrap();

    assert!(!outcome.add_to_pending_tasks);
    // Skipped before evaluation: no verdict recorded
    assert!(outcome.context.evaluation.is_none());
}

#[test]
fn unprobeable_files_stay_undecided() {
    let outcome = hooks::file_test(
        Path::new("/library/Show/ep.mkv"),
        None,
        &StubMarker(false),
        &PluginConfig::default(),
    )
    .unwrap();

    assert!(!outcome.add_to_pending_tasks);
    assert!(outcome.context.evaluation.is_none());
}

#[test]
fn optimized_marker_short_circuits_evaluation() {
    let probe = hevc_probe();
    let outcome = hooks::file_test(
        Path::new("/library/Show/ep.mkv"),
        Some(&probe),
        &StubMarker(true),
        &PluginConfig::default(),
    )
    .unwrap();

    assert!(!outcome.add_to_pending_tasks);
    assert!(outcome.context.evaluation.is_none());
}

#[test]
fn defective_file_is_queued_with_its_evaluation() {
    let probe = hevc_probe();
    let outcome = hooks::file_test(
        Path::new("/library/Show/ep.mkv"),
        Some(&probe),
        &StubMarker(false),
        &PluginConfig::default(),
    )
    .unwrap();

    assert!(outcome.add_to_pending_tasks);
    let evaluation = outcome.context.evaluation.unwrap();
    assert!(evaluation.decision.needs_processing);
    assert!(evaluation.flags.non_h264);
}

#[test]
fn normalized_file_is_not_queued() {
    let probe = normalized_probe();
    let outcome = hooks::file_test(
        Path::new("/library/Show/ep.mkv"),
        Some(&probe),
        &StubMarker(false),
        &PluginConfig::default(),
    )
    .unwrap();

    assert!(!outcome.add_to_pending_tasks);
    let evaluation = outcome.context.evaluation.unwrap();
    assert!(!evaluation.decision.needs_processing);
    assert!(evaluation.plan.is_noop());
}

#[test]
fn fs_marker_detects_existing_optimized_counterpart() {
    let dir = tempfile::tempdir().unwrap();
    let show = dir.path().join("Show");
    let season = show.join("Season 1");
    fs::create_dir_all(&season).unwrap();
    let source = season.join("ep.mkv");
    fs::write(&source, b"").unwrap();

    assert!(!FsMarker.is_optimized(&source));

    let optimized = show
        .join("Plex Versions")
        .join("Optimized for TV")
        .join("Season 1");
    fs::create_dir_all(&optimized).unwrap();
    fs::write(optimized.join("ep.mkv"), b"").unwrap();

    assert!(FsMarker.is_optimized(&source));
}

#[test]
fn fs_marker_skips_files_already_inside_the_optimized_tree() {
    let path = Path::new("/library/Show/Plex Versions/Optimized for TV/Season 1/ep.mkv");
    assert!(FsMarker.is_optimized(path));
}

#[test]
fn worker_redirects_output_into_the_cache_directory() {
    let probe = hevc_probe().with_duration(1200.0);
    let config = PluginConfig {
        cache_dir: Some(PathBuf::from("/var/cache/tvnorm")),
        ..PluginConfig::default()
    };

    let mut context = FileContext::new("/library/Show/ep.mp4");
    let outcome = hooks::worker(
        &mut context,
        &probe,
        Path::new("/library/Show/ep.mp4"),
        Path::new("/tmp/host-out.mp4"),
        &config,
    )
    .unwrap();

    assert_eq!(outcome.file_out, PathBuf::from("/var/cache/tvnorm/ep.mkv"));
    let cmd = outcome.exec_command.unwrap();
    assert_eq!(cmd.program, "ffmpeg");
    assert_eq!(cmd.args.last().unwrap(), "/var/cache/tvnorm/ep.mkv");
    assert!(outcome.progress.is_some());
}

#[test]
fn worker_without_cache_directory_keeps_host_path_as_mkv() {
    let probe = hevc_probe();
    let mut context = FileContext::new("/library/Show/ep.mp4");
    let outcome = hooks::worker(
        &mut context,
        &probe,
        Path::new("/library/Show/ep.mp4"),
        Path::new("/tmp/host-out.mp4"),
        &PluginConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.file_out, PathBuf::from("/tmp/host-out.mkv"));
}

#[test]
fn worker_reuses_the_file_test_evaluation() {
    let config = PluginConfig::default();
    let probe = ProbeResult::new(
        vec![
            StreamDescriptor::new(0, CodecType::Audio, "mp3"),
            StreamDescriptor::new(1, CodecType::Video, "h264"),
        ],
        "mkv",
    );

    let tested = hooks::file_test(
        Path::new("/library/Show/ep.mkv"),
        Some(&probe),
        &StubMarker(false),
        &config,
    )
    .unwrap();
    assert!(tested.add_to_pending_tasks);

    let mut context = tested.context;
    let outcome = hooks::worker(
        &mut context,
        &probe,
        Path::new("/library/Show/ep.mkv"),
        Path::new("/tmp/out.mkv"),
        &config,
    )
    .unwrap();

    // The command comes from the same ladder walk that queued the file
    let cmd = outcome.exec_command.unwrap();
    let map = cmd.args.iter().position(|a| a == "-map").unwrap();
    assert_eq!(cmd.args[map + 1], "0:1");
}

#[test]
fn worker_emits_no_command_for_normalized_files() {
    let probe = normalized_probe();
    let mut context = FileContext::new("/library/Show/ep.mkv");
    let outcome = hooks::worker(
        &mut context,
        &probe,
        Path::new("/library/Show/ep.mkv"),
        Path::new("/tmp/out.mkv"),
        &PluginConfig::default(),
    )
    .unwrap();

    assert!(outcome.exec_command.is_none());
    assert!(outcome.progress.is_none());
    assert_eq!(
        context.evaluation.map(|e| e.plan),
        Some(TranscodePlan::NoOp)
    );
}

#[test]
fn post_process_routes_reencoded_files_to_the_optimized_tree() {
    let probe = hevc_probe();
    let config = PluginConfig::default();
    let source = Path::new("/library/Show/Season 1/ep.mkv");

    let tested = hooks::file_test(source, Some(&probe), &StubMarker(false), &config).unwrap();
    let movement = hooks::post_process(&tested.context);

    assert_eq!(
        movement.destination,
        PathBuf::from("/library/Show/Plex Versions/Optimized for TV/Season 1/ep.mkv")
    );
    assert!(!movement.remove_source_file);
    assert!(movement.copy_file);
    assert!(!movement.run_default_file_copy);
}

#[test]
fn post_process_replaces_in_place_without_reencode() {
    let probe = ProbeResult::new(
        vec![
            StreamDescriptor::new(0, CodecType::Video, "h264"),
            StreamDescriptor::new(1, CodecType::Audio, "ac3"),
        ],
        "avi",
    );
    let config = PluginConfig::default();
    let source = Path::new("/library/Show/Season 1/ep.avi");

    let tested = hooks::file_test(source, Some(&probe), &StubMarker(false), &config).unwrap();
    let evaluation = tested.context.evaluation.as_ref().unwrap();
    assert_eq!(evaluation.plan, TranscodePlan::Remux);

    let movement = hooks::post_process(&tested.context);
    assert_eq!(movement.destination, PathBuf::from(source));
}

#[test]
fn queued_plan_matches_the_queue_reason() {
    // A file queued for first-audio repair gets the first-audio command,
    // regardless of later defects it also carries
    let probe = ProbeResult::new(
        vec![
            StreamDescriptor::new(0, CodecType::Video, "h264"),
            StreamDescriptor::new(1, CodecType::Audio, "aac"),
            StreamDescriptor::new(2, CodecType::Subtitle, "subrip"),
        ],
        "avi",
    );
    let tested = hooks::file_test(
        Path::new("/library/Show/ep.avi"),
        Some(&probe),
        &StubMarker(false),
        &PluginConfig::default(),
    )
    .unwrap();

    let evaluation = tested.context.evaluation.unwrap();
    assert_eq!(
        evaluation.plan,
        TranscodePlan::Normalize {
            video_mapping: VideoMapping::FirstVideo,
            video: VideoDirective::Copy,
            audio: AudioDirective::TranscodeFirstToAc3,
        }
    );
}
