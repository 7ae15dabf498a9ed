//! Per-item classification for the conversion pipeline
//!
//! Every call returns exactly one [`Outcome`]. Faults are turned into
//! `Outcome::Error` here so a failing item never disturbs its siblings in the
//! worker pool.

use filetime::FileTime;
use std::collections::hash_map::{Entry, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{extension_of, ConvertConfig};
use crate::error::ItemError;
use crate::models::{Outcome, WorkItem};
use crate::transcode::Transcoder;

/// A work item paired with the earlier item that already owns its destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem<'a> {
    pub item: &'a WorkItem,
    /// Source of the earlier item writing the same destination, if any
    pub claimed_by: Option<PathBuf>,
}

/// Decides what happens to each work item and does it
pub struct Classifier<'a> {
    config: &'a ConvertConfig,
    transcoder: &'a dyn Transcoder,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a ConvertConfig, transcoder: &'a dyn Transcoder) -> Self {
        Self { config, transcoder }
    }

    fn is_transform(&self, item: &WorkItem) -> bool {
        self.config.is_transformable(&extension_of(&item.source))
    }

    /// Where `item` ends up, after any extension rewrite
    pub fn planned_destination(&self, item: &WorkItem) -> PathBuf {
        let destination = item.destination();
        if self.is_transform(item) {
            destination.with_extension(&self.config.target_extension)
        } else {
            destination
        }
    }

    /// Pair every item with the first earlier item sharing its destination.
    ///
    /// `a.flac` and `a.wav` both become `a.mp3`; the one enumerated first
    /// keeps the destination.
    pub fn plan<'i>(&self, items: &'i [WorkItem]) -> Vec<PlannedItem<'i>> {
        let mut owners: HashMap<PathBuf, &'i Path> = HashMap::with_capacity(items.len());
        items
            .iter()
            .map(|item| {
                let claimed_by = match owners.entry(self.planned_destination(item)) {
                    Entry::Occupied(owner) => Some(owner.get().to_path_buf()),
                    Entry::Vacant(slot) => {
                        slot.insert(&item.source);
                        None
                    }
                };
                PlannedItem { item, claimed_by }
            })
            .collect()
    }

    /// Process one planned item; a claimed destination is never touched
    pub fn classify_planned(&self, planned: &PlannedItem<'_>) -> Outcome {
        match &planned.claimed_by {
            Some(owner) => {
                let err = ItemError::DestinationClaimed {
                    destination: self.planned_destination(planned.item),
                    claimed_by: owner.clone(),
                };
                Outcome::error(planned.item.source.clone(), err.to_string())
            }
            None => self.classify(planned.item),
        }
    }

    /// Process one item
    pub fn classify(&self, item: &WorkItem) -> Outcome {
        match self.try_classify(item) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::error(item.source.clone(), e.to_string()),
        }
    }

    fn try_classify(&self, item: &WorkItem) -> Result<Outcome, ItemError> {
        let destination = self.planned_destination(item);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.is_transform(item) {
            self.transform(&item.source, destination)
        } else {
            pass_through(&item.source, destination)
        }
    }

    fn transform(&self, source: &Path, destination: PathBuf) -> Result<Outcome, ItemError> {
        if destination.exists() {
            log::debug!("Skipping {:?}: {:?} exists", source, destination);
            return Ok(Outcome::Skipped(destination));
        }

        if let Err(e) = self.transcoder.transcode(source, &destination) {
            discard_partial(&destination);
            return Err(e);
        }
        log::debug!("Converted {:?} -> {:?}", source, destination);
        Ok(Outcome::Converted(destination))
    }
}

/// Remove whatever a failed transcode left behind so a re-run retries it
fn discard_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::warn!("Removed partial output {:?}", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove partial output {:?}: {}", path, e),
    }
}

fn pass_through(source: &Path, destination: PathBuf) -> Result<Outcome, ItemError> {
    if destination.exists() {
        return Ok(Outcome::Skipped(destination));
    }

    copy_preserving_times(source, &destination).map_err(ItemError::CopyFailure)?;
    log::debug!("Copied {:?} -> {:?}", source, destination);
    Ok(Outcome::Copied(destination))
}

/// Copy contents and permissions, then carry over access and modification times
fn copy_preserving_times(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::copy(source, destination)?;
    let metadata = fs::metadata(source)?;
    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
}
