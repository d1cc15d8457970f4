//! # trackset - Tracking dataset normalization
//!
//! Turns per-video multi-object-tracking ground truth (SoccerNet-style folders
//! with `key=value` metadata files and MOT bounding-box text files) into one
//! consistent relational dataset of videos, images and detections, and writes
//! tracking predictions back out in interchange formats.
//!
//! ## Features
//!
//! - `key=value` metadata parsing (`gameinfo.ini`, `seqinfo.ini`)
//! - Tracklet role decoding into a global, sorted category taxonomy
//! - Collision-free image/detection identifiers across many videos
//! - Referential integrity validation of the resulting tables
//! - MOT text and pose/keypoint JSON export grouped per video
//!
//! ## Example
//!
//! ```rust,ignore
//! use trackset::{DatasetLayout, TrackingSetBuilder};
//!
//! let builder = TrackingSetBuilder::new(DatasetLayout::default());
//! let set = builder.build("SoccerNet/tracking/train")?;
//! println!("{} videos, {} detections", set.videos.len(), set.detections.len());
//! ```

pub mod config;
pub mod dataset;
pub mod export;
pub mod soccernet;

pub use config::DatasetLayout;
pub use dataset::{BboxLtwh, Category, Detection, Image, Taxonomy, TrackingSet, Video};
pub use export::{ExportFormat, Prediction, ResultExporter, Source};
pub use soccernet::{IdentifierAllocator, SoccerNetMot, TrackingSetBuilder};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    /// Errors that can occur while ingesting or exporting tracking data
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Malformed config '{path}': {message}")]
        MalformedConfig { path: String, message: String },

        #[error("Malformed ground truth '{path}' line {line}: {message}")]
        MalformedGroundTruth {
            path: String,
            line: usize,
            message: String,
        },

        #[error("Unknown team for role '{0}'")]
        UnknownTeam(String),

        #[error("Unknown role '{0}'")]
        UnknownRole(String),

        #[error("Detection references undeclared tracklet {track_id}")]
        UndeclaredTracklet { track_id: i64 },

        #[error("Missing file: {}", .0.display())]
        MissingFile(PathBuf),

        #[error("Failed to ingest video '{video}': {source}")]
        Ingestion {
            video: String,
            #[source]
            source: Box<Error>,
        },

        #[error("Integrity violation: {0}")]
        Integrity(String),

        #[error("Invalid prediction: {0}")]
        InvalidPrediction(String),

        #[error("Invalid configuration: {0}")]
        Config(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),
    }

    impl Error {
        /// Wrap a per-video failure so the whole build aborts with context.
        pub fn ingestion(video: impl Into<String>, source: Error) -> Self {
            Error::Ingestion {
                video: video.into(),
                source: Box::new(source),
            }
        }
    }

    /// Result type for trackset operations
    pub type Result<T> = std::result::Result<T, Error>;
}
