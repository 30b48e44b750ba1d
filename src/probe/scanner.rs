//! Merge input discovery

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{SplicerError, SplicerResult};

/// Extensions recognised as video files, compared case-insensitively
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
];

/// Order of merge inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Byte-wise file name order; `clip-10` sorts before `clip-2`
    #[default]
    Lexicographic,
    /// Digit runs compare by value; `clip-2` sorts before `clip-10`
    Natural,
}

/// Whether `path` carries a recognised video extension
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Video files directly inside `dir`, sorted by file name.
/// Subdirectories are not descended into; `exclude` names a file to skip.
pub fn scan_video_files(
    dir: &Path,
    exclude: Option<&str>,
    order: SortOrder,
) -> SplicerResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SplicerError::InvalidPath {
            message: format!("{} is not a directory", dir.display()),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| SplicerError::InvalidPath {
            message: format!("cannot read {}: {}", dir.display(), e),
        })?;

        // follows symlinks; broken links are skipped
        if !entry.path().is_file() || !is_video_file(entry.path()) {
            continue;
        }
        if exclude.is_some_and(|name| entry.file_name() == name) {
            tracing::debug!(file = %entry.path().display(), "Skipping merge output");
            continue;
        }
        files.push(entry.into_path());
    }

    match order {
        SortOrder::Lexicographic => files.sort_by(|a, b| a.file_name().cmp(&b.file_name())),
        SortOrder::Natural => files.sort_by(|a, b| natural_cmp(&name_of(a), &name_of(b))),
    }

    tracing::debug!(dir = %dir.display(), count = files.len(), "Scanned merge inputs");
    Ok(files)
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compare strings with digit runs ordered by numeric value
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_digits = take_digits(&mut left);
                let y_digits = take_digits(&mut right);
                let x_trimmed = x_digits.trim_start_matches('0');
                let y_trimmed = y_digits.trim_start_matches('0');
                let ordering = x_trimmed
                    .len()
                    .cmp(&y_trimmed.len())
                    .then_with(|| x_trimmed.cmp(y_trimmed))
                    .then_with(|| x_digits.len().cmp(&y_digits.len()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
