//! SoccerNet tracking dataset ingestion.
//!
//! This module turns SoccerNet-style MOT folders into `TrackingSet`s:
//!
//! - `InformationFile` - Parse `gameinfo.ini` / `seqinfo.ini` metadata files
//! - `GroundTruthFile` - Parse `gt/gt.txt` bounding-box files
//! - `TrackletRole` - Decode tracklet role descriptors into categories
//! - `IdentifierAllocator` - Reserve video and image ids across videos
//! - `TrackingSetBuilder` - Build one split into a `TrackingSet`
//! - `SoccerNetMot` - Train / validation / test splits of a dataset root

mod allocator;
mod builder;
mod ground_truth;
mod information_file;
mod roles;

pub use allocator::{IdentifierAllocator, VideoSlot};
pub use builder::{TrackingSetBuilder, VideoPlan, VideoTables};
pub use ground_truth::{GroundTruthFile, GroundTruthRow};
pub use information_file::InformationFile;
pub use roles::TrackletRole;

use crate::config::DatasetLayout;
use crate::dataset::TrackingSet;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// A SoccerNet tracking dataset root with one folder per split.
///
/// Each split is built independently and has its own id space.
#[derive(Debug, Clone)]
pub struct SoccerNetMot {
    pub dataset_path: PathBuf,
    pub train_set: TrackingSet,
    pub val_set: TrackingSet,
    pub test_set: Option<TrackingSet>,
}

impl SoccerNetMot {
    /// Load the train and validation splits, and the test split if the
    /// layout names one.
    pub fn new<P: AsRef<Path>>(dataset_path: P, layout: DatasetLayout) -> Result<Self> {
        let dataset_path = dataset_path.as_ref().to_path_buf();
        if !dataset_path.exists() {
            return Err(Error::MissingFile(dataset_path));
        }

        let builder = TrackingSetBuilder::new(layout);
        let layout = builder.layout();

        info!("Loading train split '{}'", layout.train_split);
        let train_set = builder.build(dataset_path.join(&layout.train_split))?;
        info!("Loading validation split '{}'", layout.val_split);
        let val_set = builder.build(dataset_path.join(&layout.val_split))?;
        let test_set = match &layout.test_split {
            Some(split) => {
                info!("Loading test split '{}'", split);
                Some(builder.build(dataset_path.join(split))?)
            }
            None => None,
        };

        Ok(Self {
            dataset_path,
            train_set,
            val_set,
            test_set,
        })
    }
}
