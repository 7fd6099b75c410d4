use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::source::FileSource;

/// Case-insensitive suffix match of `name` against `extensions`
/// (given with or without the leading dot).
pub fn is_audio_name(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_ascii_lowercase();
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .any(|ext| {
            lower.len() > ext.len() + 1
                && lower.ends_with(ext.as_str())
                && lower.as_bytes()[lower.len() - ext.len() - 1] == b'.'
        })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Enumerate `dir` and return the recognized audio files, sorted by name.
pub fn scan_folder(dir: &Path, settings: &LibrarySettings) -> Vec<FileSource> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    // Non-recursive = only the folder's own entries.
    if !settings.recursive {
        walker = walker.max_depth(1);
    }

    let mut found: Vec<FileSource> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable folder entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|name| is_audio_name(name, &settings.extensions))
                .unwrap_or(false)
        })
        .map(|e| FileSource::new(e.into_path()))
        .collect();

    found.sort_by(|a, b| {
        a.path()
            .to_string_lossy()
            .to_lowercase()
            .cmp(&b.path().to_string_lossy().to_lowercase())
    });
    found
}

/// The outcome of turning command-line paths into sources.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub sources: Vec<FileSource>,
    /// Non-fatal problems worth showing to the user.
    pub notices: Vec<String>,
}

/// Resolve folders and files into sources. Folders are scanned; files are
/// kept when their extension is accepted.
pub fn collect_sources(paths: &[PathBuf], settings: &LibrarySettings) -> ScanReport {
    let mut report = ScanReport::default();

    for path in paths {
        if path.is_dir() {
            let found = scan_folder(path, settings);
            if found.is_empty() {
                warn!(dir = %path.display(), "no audio files found");
                report
                    .notices
                    .push(format!("No music files found in {}", path.display()));
            } else {
                info!(dir = %path.display(), count = found.len(), "scanned folder");
            }
            report.sources.extend(found);
        } else if path.is_file() {
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if is_audio_name(&name, &settings.extensions) {
                report.sources.push(FileSource::new(path.clone()));
            } else {
                report
                    .notices
                    .push(format!("Unsupported file type: {}", path.display()));
            }
        } else {
            report
                .notices
                .push(format!("Not found: {}", path.display()));
        }
    }

    report
}
