//! Pose / keypoint JSON export.

use nalgebra::DMatrix;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

use super::{sorted_by_frame, ExportFormat, Prediction, Source};
use crate::{Error, Result};

/// Entry of the `images` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseImage {
    pub file_name: String,
    pub id: u64,
    pub image_id: u64,
}

/// Entry of the `annotations` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseAnnotation {
    pub bbox: [f64; 4],
    pub image_id: u64,
    /// One `[x, y, conf]` array per keypoint
    #[serde(serialize_with = "serialize_rows")]
    pub keypoints: DMatrix<f64>,
    pub scores: Vec<f64>,
    pub person_id: i64,
    pub track_id: i64,
}

/// Contents of one `<video>.json` file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseDocument {
    pub images: Vec<PoseImage>,
    pub annotations: Vec<PoseAnnotation>,
}

/// Serialize a matrix as an array of row arrays.
fn serialize_rows<S: Serializer>(
    matrix: &DMatrix<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(matrix.nrows()))?;
    for row in matrix.row_iter() {
        let values: Vec<f64> = row.iter().copied().collect();
        seq.serialize_element(&values)?;
    }
    seq.end()
}

/// Build the pose document of one video.
///
/// `images` lists every distinct (file path, image id) pair of the video's
/// rows, whatever their source. `annotations` depends on `format`:
/// * `PoseEstimation` - rows with `source >= Detection`; `person_id` and
///   `track_id` are the row's position in `predictions` (placeholders)
/// * `PoseTracking` - `Tracked` rows with their real `person_id`
///
/// Rows are taken in frame order.
pub fn pose_document(
    predictions: &[Prediction],
    rows: &[usize],
    format: ExportFormat,
) -> Result<PoseDocument> {
    let rows = sorted_by_frame(predictions, rows);

    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for &index in &rows {
        let prediction = &predictions[index];
        if seen.insert((&prediction.file_path, prediction.image_id)) {
            images.push(PoseImage {
                file_name: prediction.file_path.to_string_lossy().into_owned(),
                id: prediction.image_id,
                image_id: prediction.image_id,
            });
        }
    }

    let mut annotations = Vec::new();
    for &index in &rows {
        let prediction = &predictions[index];
        let identity = match format {
            ExportFormat::PoseEstimation if prediction.source >= Source::Detection => index as i64,
            ExportFormat::PoseTracking if prediction.source == Source::Tracked => {
                prediction.person_id.ok_or_else(|| {
                    Error::InvalidPrediction(format!(
                        "tracked row {} of video '{}' has no person_id",
                        index, prediction.video_name
                    ))
                })?
            }
            ExportFormat::MotBoxes => {
                return Err(Error::InvalidPrediction(
                    "MOT boxes are not a pose format".to_string(),
                ))
            }
            _ => continue,
        };
        annotations.push(annotation(index, prediction, identity)?);
    }

    Ok(PoseDocument {
        images,
        annotations,
    })
}

fn annotation(index: usize, prediction: &Prediction, identity: i64) -> Result<PoseAnnotation> {
    let keypoints = &prediction.keypoints;
    if keypoints.nrows() > 0 && keypoints.ncols() != 3 {
        return Err(Error::InvalidPrediction(format!(
            "row {} keypoints have shape ({}, {}), expected (n, 3)",
            index,
            keypoints.nrows(),
            keypoints.ncols()
        )));
    }
    let scores = if keypoints.nrows() > 0 {
        keypoints.column(2).iter().copied().collect()
    } else {
        Vec::new()
    };

    Ok(PoseAnnotation {
        bbox: prediction.bbox_ltwh.to_array(),
        image_id: prediction.image_id,
        keypoints: keypoints.clone(),
        scores,
        person_id: identity,
        track_id: identity,
    })
}
