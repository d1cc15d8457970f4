//! Tracking result export.
//!
//! - `Prediction` - one row of a prediction table
//! - `ResultExporter` - writes one file per video in a chosen `ExportFormat`
//! - MOT text export (`<video>.txt`) and pose/keypoint JSON export
//!   (`<video>.json`)

mod mot;
mod pose;

pub use mot::mot_lines;
pub use pose::{pose_document, PoseAnnotation, PoseDocument, PoseImage};

use nalgebra::DMatrix;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::dataset::{BboxLtwh, TrackingSet};
use crate::{Error, Result};

/// Provenance of a prediction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// Ground-truth annotation
    GroundTruth = 0,
    /// Detection not (yet) associated to a track
    Detection = 1,
    /// Detection associated to a track
    Tracked = 2,
}

impl Source {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Source::GroundTruth),
            1 => Some(Source::Detection),
            2 => Some(Source::Tracked),
            _ => None,
        }
    }
}

/// One row of a prediction table produced by detection / tracking stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub video_name: String,
    /// 0-based frame index within the video
    pub frame: u64,
    pub source: Source,
    pub image_id: u64,
    pub file_path: PathBuf,
    /// Track identity; required for `Source::Tracked` rows
    pub person_id: Option<i64>,
    pub track_id: Option<i64>,
    pub bbox_ltwh: BboxLtwh,
    pub bbox_conf: f64,
    /// Keypoints as an n x 3 matrix of (x, y, confidence); may have no rows
    pub keypoints: DMatrix<f64>,
}

impl Prediction {
    /// Turn the detections of a tracking set into prediction rows.
    ///
    /// Video name, frame and file path are joined from the video and image
    /// tables; keypoints are empty.
    pub fn from_tracking_set(set: &TrackingSet, source: Source) -> Result<Vec<Prediction>> {
        set.detections
            .iter()
            .map(|detection| -> Result<Prediction> {
                let image = set.image(detection.image_id).ok_or_else(|| {
                    Error::Integrity(format!(
                        "detection {} references missing image {}",
                        detection.id, detection.image_id
                    ))
                })?;
                let video = set.video(detection.video_id).ok_or_else(|| {
                    Error::Integrity(format!(
                        "detection {} references missing video {}",
                        detection.id, detection.video_id
                    ))
                })?;
                Ok(Prediction {
                    video_name: video.name.clone(),
                    frame: image.frame,
                    source,
                    image_id: image.id,
                    file_path: image.file_path.clone(),
                    person_id: Some(detection.person_id),
                    track_id: Some(detection.track_id),
                    bbox_ltwh: detection.bbox_ltwh,
                    bbox_conf: detection.bbox_conf,
                    keypoints: DMatrix::zeros(0, 3),
                })
            })
            .collect()
    }
}

/// Output format of `ResultExporter::export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `<video>.txt`, tracked rows only
    MotBoxes,
    /// `<video>.json`, every detection with placeholder identities
    PoseEstimation,
    /// `<video>.json`, tracked rows only with their track identities
    PoseTracking,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::MotBoxes => "txt",
            ExportFormat::PoseEstimation | ExportFormat::PoseTracking => "json",
        }
    }
}

/// Writes prediction tables as per-video interchange files.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    output_dir: PathBuf,
}

impl ResultExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one file per distinct `video_name`, in order of first appearance.
    ///
    /// Each file is rendered completely before it is written, so a failure
    /// leaves files of earlier videos intact.
    ///
    /// # Returns
    /// Paths of the written files.
    pub fn export(&self, predictions: &[Prediction], format: ExportFormat) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to create output folder {:?}: {}", self.output_dir, e),
            ))
        })?;

        let mut written = Vec::new();
        for (video_name, rows) in group_by_video(predictions) {
            let content = match format {
                ExportFormat::MotBoxes => mot_lines(predictions, &rows)?,
                ExportFormat::PoseEstimation | ExportFormat::PoseTracking => {
                    let document = pose_document(predictions, &rows, format)?;
                    serde_json::to_string(&document)?
                }
            };

            let path = self
                .output_dir
                .join(format!("{}.{}", video_name, format.extension()));
            fs::write(&path, content)?;
            debug!("Wrote {:?} ({} rows)", path, rows.len());
            written.push(path);
        }

        info!(
            "Exported {} videos as {:?} to {:?}",
            written.len(),
            format,
            self.output_dir
        );
        Ok(written)
    }
}

/// Row indices of each video, videos in order of first appearance.
fn group_by_video(predictions: &[Prediction]) -> Vec<(&str, Vec<usize>)> {
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (index, prediction) in predictions.iter().enumerate() {
        let name = prediction.video_name.as_str();
        let position = *positions.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(index);
    }
    groups
}

/// Stable sort of row indices by frame.
fn sorted_by_frame(predictions: &[Prediction], rows: &[usize]) -> Vec<usize> {
    let mut rows = rows.to_vec();
    rows.sort_by_key(|&i| predictions[i].frame);
    rows
}
