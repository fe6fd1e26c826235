//! Library path conventions
//!
//! Output routing for processed files follows the Plex optimized-versions
//! layout: a re-encoded copy of `…/Show/Episode.mkv` lives at
//! `…/Plex Versions/Optimized for TV/Show/Episode.mkv`, rooted next to the
//! show directory and named after it.

use std::path::{Component, Path, PathBuf};

/// First path segment of the optimized-versions tree
pub const PLEX_VERSIONS_DIR: &str = "Plex Versions";
/// Second path segment; also the marker that a file is an optimized copy
pub const OPTIMIZED_DIR: &str = "Optimized for TV";

/// Destination for the optimized copy of `source`, or `None` when the path
/// is too shallow to carry the convention (no parent or grandparent)
pub fn optimized_output_path(source: &Path) -> Option<PathBuf> {
    let file_name = source.file_name()?;
    let parent = source.parent()?;
    let parent_name = parent.file_name()?;
    let grandparent = parent.parent()?;

    Some(
        grandparent
            .join(PLEX_VERSIONS_DIR)
            .join(OPTIMIZED_DIR)
            .join(parent_name)
            .join(file_name),
    )
}

/// True when the path already lives inside an optimized-versions tree
pub fn in_optimized_tree(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == OPTIMIZED_DIR))
}

/// Lower-cased extension without the dot
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
