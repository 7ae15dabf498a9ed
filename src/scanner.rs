//! Tree enumeration - builds the fixed work set before processing starts
//!
//! The walk descends without a depth limit and does not follow symbolic
//! links: a link is neither traversed nor reported as a file. Entries are
//! sorted by file name so the same tree always enumerates in the same order.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::extension_of;
use crate::error::PipelineError;
use crate::models::WorkItem;

/// Validate the input root and return its absolute form
fn resolve_root(root: &Path) -> Result<PathBuf, PipelineError> {
    if !root.is_dir() {
        return Err(PipelineError::invalid_input(root.to_path_buf()));
    }
    std::fs::canonicalize(root).map_err(|_| PipelineError::invalid_input(root.to_path_buf()))
}

/// Walk an already-resolved root and collect every regular file
fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                log::warn!(
                    "Skipping unreadable entry {:?}: {}",
                    e.path().map(|p| p.to_path_buf()),
                    e
                );
            }
        }
    }

    files
}

/// List every regular file under `root`
pub fn enumerate_files(root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let root = resolve_root(root)?;
    Ok(walk_files(&root))
}

/// Build the work set for the conversion pipeline
pub fn discover(input_root: &Path, output_root: &Path) -> Result<Vec<WorkItem>, PipelineError> {
    let root = resolve_root(input_root)?;
    let items = walk_files(&root)
        .into_iter()
        .filter_map(|source| {
            let relative = source.strip_prefix(&root).ok()?.to_path_buf();
            Some(WorkItem::new(source, relative, output_root.to_path_buf()))
        })
        .collect::<Vec<_>>();

    log::debug!("Discovered {} files under {:?}", items.len(), root);
    Ok(items)
}

/// List audio files under `root`, filtered by a lowercase extension predicate
pub fn discover_audio<F>(root: &Path, is_audio: F) -> Result<Vec<PathBuf>, PipelineError>
where
    F: Fn(&str) -> bool,
{
    Ok(enumerate_files(root)?
        .into_iter()
        .filter(|p| is_audio(&extension_of(p)))
        .collect())
}
