//! Normalized tracking dataset tables.
//!
//! - `Video` / `Image` / `Detection` - table rows with fixed column order
//! - `Taxonomy` - global category set with sorted, deterministic ids
//! - `TrackingSet` - the aggregate owning all three tables

mod category;
mod records;

pub use category::{Category, Taxonomy, SUPERCATEGORY};
pub use records::{BboxLtwh, Detection, Image, Role, Team, Video};

use crate::{Error, Result};
use std::collections::HashMap;

/// Videos, images and detections of one dataset split.
///
/// Rows are owned by value and reference each other only through ids that
/// exist inside the same set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingSet {
    pub videos: Vec<Video>,
    pub images: Vec<Image>,
    pub detections: Vec<Detection>,
}

impl TrackingSet {
    pub fn new(videos: Vec<Video>, images: Vec<Image>, detections: Vec<Detection>) -> Self {
        Self {
            videos,
            images,
            detections,
        }
    }

    pub fn video(&self, video_id: u64) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == video_id)
    }

    /// Images are stored in id order starting at 0, so lookup is an index.
    pub fn image(&self, image_id: u64) -> Option<&Image> {
        self.images
            .get(image_id as usize)
            .filter(|image| image.id == image_id)
    }

    /// Detections of one video, in table order.
    pub fn detections_of(&self, video_id: u64) -> impl Iterator<Item = &Detection> {
        self.detections.iter().filter(move |d| d.video_id == video_id)
    }

    /// Check every referential and identifier invariant of the tables.
    ///
    /// Returns the first violation found as `Error::Integrity`.
    pub fn validate(&self) -> Result<()> {
        let mut videos: HashMap<u64, &Video> = HashMap::with_capacity(self.videos.len());
        for (i, video) in self.videos.iter().enumerate() {
            if video.id != i as u64 + 1 {
                return Err(Error::Integrity(format!(
                    "video at row {} has id {}, expected {}",
                    i,
                    video.id,
                    i + 1
                )));
            }
            videos.insert(video.id, video);
        }

        for (i, image) in self.images.iter().enumerate() {
            if image.id != i as u64 {
                return Err(Error::Integrity(format!(
                    "image at row {} has id {}, expected {}",
                    i, image.id, i
                )));
            }
            if !videos.contains_key(&image.video_id) {
                return Err(Error::Integrity(format!(
                    "image {} references missing video {}",
                    image.id, image.video_id
                )));
            }
        }

        let mut categories: HashMap<u64, &str> = HashMap::new();
        for video in &self.videos {
            for category in &video.categories {
                categories.insert(category.id, category.name.as_str());
            }
        }

        for (i, detection) in self.detections.iter().enumerate() {
            if detection.id != i as u64 {
                return Err(Error::Integrity(format!(
                    "detection at row {} has id {}, expected {}",
                    i, detection.id, i
                )));
            }
            if !videos.contains_key(&detection.video_id) {
                return Err(Error::Integrity(format!(
                    "detection {} references missing video {}",
                    detection.id, detection.video_id
                )));
            }
            let image = self.image(detection.image_id).ok_or_else(|| {
                Error::Integrity(format!(
                    "detection {} references missing image {}",
                    detection.id, detection.image_id
                ))
            })?;
            if image.video_id != detection.video_id {
                return Err(Error::Integrity(format!(
                    "detection {} is in video {} but image {} is in video {}",
                    detection.id, detection.video_id, image.id, image.video_id
                )));
            }
            if let Some(category_id) = detection.category_id {
                let name = categories.get(&category_id).ok_or_else(|| {
                    Error::Integrity(format!(
                        "detection {} references missing category {}",
                        detection.id, category_id
                    ))
                })?;
                if detection.category.as_deref() != Some(*name) {
                    return Err(Error::Integrity(format!(
                        "detection {} category {:?} does not match category {} ('{}')",
                        detection.id, detection.category, category_id, name
                    )));
                }
            }
        }

        Ok(())
    }
}
