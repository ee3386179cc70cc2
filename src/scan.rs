// Photo discovery. The list produced here is fixed for the whole run.

use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted extension spellings, in the order their groups are emitted.
/// Matching is exact per spelling, so `photo.Jpg` is not picked up.
pub const EXTENSION_VARIANTS: [&str; 4] = ["jpg", "JPG", "jpeg", "JPEG"];

/// A photo on disk plus the name shown in progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub name: String,
}

impl PhotoFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        PhotoFile { path, name }
    }
}

/// List the eligible photos directly inside `dir` (no recursion).
///
/// Files are grouped by the spelling of their extension in
/// [`EXTENSION_VARIANTS`] order and sorted by path inside each group, so the
/// result is not one global lexicographic order. Sequential batches depend on
/// this order. An empty result is returned as `Ok`.
pub fn enumerate(dir: &Path) -> Result<Vec<PhotoFile>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let read_err = |source| ScanError::ReadDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut groups: [Vec<PathBuf>; EXTENSION_VARIANTS.len()] = Default::default();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some(slot) = EXTENSION_VARIANTS.iter().position(|v| *v == ext) {
            groups[slot].push(path);
        }
    }

    let photos: Vec<PhotoFile> = groups
        .into_iter()
        .flat_map(|mut group| {
            group.sort();
            group.into_iter().map(PhotoFile::new)
        })
        .collect();

    tracing::debug!(dir = %dir.display(), count = photos.len(), "enumerated photos");
    Ok(photos)
}
