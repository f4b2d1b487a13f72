//! Destination directories for leaf selections.

use std::path::{Component, Path, PathBuf};

use url::Url;

use super::error::DownloadError;
use crate::selection::{Level, Selection};

/// Where one asset goes and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub directory: PathBuf,
    pub url: Url,
}

/// `<root>/<lighting lowercased>/<camera display name>/<format lowercased>`.
///
/// The camera display name is kept verbatim. Each value must be exactly one
/// normal path component, so no value can leave `root`.
///
/// # Errors
///
/// Returns [`DownloadError::UnsafeDirectory`] for the first value that is
/// empty, `.` or `..`, absolute, or contains a path separator.
pub fn destination_dir(
    root: &Path,
    lighting: &str,
    camera_display: &str,
    format: &str,
) -> Result<PathBuf, DownloadError> {
    let lighting = lighting.to_lowercase();
    let format = format.to_lowercase();
    Ok(root
        .join(checked_segment(Level::Lighting, &lighting)?)
        .join(checked_segment(Level::Camera, camera_display)?)
        .join(checked_segment(Level::Format, &format)?))
}

/// Destination directory for a selection with lighting, camera and format set.
///
/// # Errors
///
/// Returns [`DownloadError::IncompleteSelection`] when one of the three is
/// unset, and [`DownloadError::UnsafeDirectory`] as [`destination_dir`] does.
pub fn selection_dir(root: &Path, selection: &Selection) -> Result<PathBuf, DownloadError> {
    let (Some(lighting), Some(camera), Some(format)) = (
        selection.value(Level::Lighting),
        selection.display(Level::Camera),
        selection.value(Level::Format),
    ) else {
        return Err(DownloadError::IncompleteSelection {
            selection: selection.to_string(),
        });
    };
    destination_dir(root, lighting, camera, format)
}

fn checked_segment(level: Level, segment: &str) -> Result<&str, DownloadError> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !segment.contains(['/', '\\']) => Ok(segment),
        _ => Err(DownloadError::UnsafeDirectory {
            level,
            segment: segment.to_string(),
        }),
    }
}
