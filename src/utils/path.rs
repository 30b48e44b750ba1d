//! Path utilities

use std::path::{Path, PathBuf};

use crate::error::{SplicerError, SplicerResult};

/// Prefix of the directory that receives split clips
pub const CLIP_DIR_PREFIX: &str = "Clip-";

/// Extension used when the source has none
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Resolve a path against the current directory without touching the filesystem
pub fn absolutize(path: &Path) -> SplicerResult<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// File stem as UTF-8, lossy for display
pub fn stem_of(path: &Path) -> SplicerResult<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| SplicerError::InvalidPath {
            message: format!("{} has no file name", path.display()),
        })
}

/// Source extension without the dot, `mp4` when absent
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// `Clip-<stem>` next to the source file
pub fn default_output_dir(source: &Path) -> SplicerResult<PathBuf> {
    let stem = stem_of(source)?;
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(format!("{}{}", CLIP_DIR_PREFIX, stem)))
}

/// Create the directory and its parents; succeeds when it already exists
pub fn ensure_directory(dir: &Path) -> SplicerResult<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// A single path component: no separators, not `.` or `..`, not empty
pub fn is_plain_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.trim().is_empty()
        && !name.contains(['/', '\\'])
        && path.file_name().is_some_and(|file| file == path.as_os_str())
}

/// Render a path as a concat demuxer `file` directive.
/// Single quotes are closed, escaped and reopened; the line is written as UTF-8.
pub fn concat_file_directive(path: &Path) -> SplicerResult<String> {
    let text = path.to_str().ok_or_else(|| SplicerError::InvalidPath {
        message: format!("{} is not valid UTF-8", path.display()),
    })?;
    Ok(format!("file '{}'", text.replace('\'', "'\\''")))
}
