//! Build a `TrackingSet` from a folder of per-video annotation folders.
//!
//! Building runs in three phases:
//! 1. `plan` - list video folders in sorted order, read their metadata and
//!    reserve ids through an `IdentifierAllocator`
//! 2. `ingest` - parse one planned video into its own tables; depends only on
//!    its `VideoPlan`, so videos may be ingested in any order or in parallel
//! 3. `reduce` - assign the global taxonomy, concatenate in plan order,
//!    number detections and resolve category ids

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::allocator::{IdentifierAllocator, VideoSlot};
use super::ground_truth::GroundTruthFile;
use super::information_file::InformationFile;
use super::roles::TrackletRole;
use crate::config::DatasetLayout;
use crate::dataset::{Detection, Image, Taxonomy, TrackingSet, Video};
use crate::{Error, Result};

/// A video folder with its metadata read and its ids reserved.
#[derive(Debug, Clone)]
pub struct VideoPlan {
    pub folder: PathBuf,
    pub folder_name: String,
    pub slot: VideoSlot,
    pub game_info: InformationFile,
    pub sequence_info: InformationFile,
}

/// Tables produced by ingesting one video.
///
/// Detection ids and category ids are unset until `reduce`.
#[derive(Debug, Clone)]
pub struct VideoTables {
    pub video: Video,
    pub images: Vec<Image>,
    pub detections: Vec<Detection>,
    /// Category of every declared tracklet, in declaration order
    pub categories: Vec<String>,
}

/// Builds tracking sets following a `DatasetLayout`.
#[derive(Debug, Clone, Default)]
pub struct TrackingSetBuilder {
    layout: DatasetLayout,
}

impl TrackingSetBuilder {
    pub fn new(layout: DatasetLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Build the tracking set of one split folder.
    ///
    /// Fails as a whole if any video is malformed; no partial set is returned.
    pub fn build<P: AsRef<Path>>(&self, split_dir: P) -> Result<TrackingSet> {
        let split_dir = split_dir.as_ref();
        let plans = self.plan(split_dir)?;
        let tables = plans
            .iter()
            .map(|plan| {
                self.ingest(plan)
                    .map_err(|e| Error::ingestion(plan.folder_name.as_str(), e))
            })
            .collect::<Result<Vec<_>>>()?;
        let set = Self::reduce(tables)?;

        info!(
            "Built tracking set from {:?}: {} videos, {} images, {} detections",
            split_dir,
            set.videos.len(),
            set.images.len(),
            set.detections.len()
        );
        Ok(set)
    }

    /// List video folders in lexical order, read their metadata and reserve
    /// their video and image ids.
    pub fn plan(&self, split_dir: &Path) -> Result<Vec<VideoPlan>> {
        let mut allocator = IdentifierAllocator::new();
        let mut plans = Vec::new();

        for folder in video_folders(split_dir)? {
            let folder_name = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let (game_info, sequence_info, frame_count) = self
                .read_metadata(&folder)
                .map_err(|e| Error::ingestion(folder_name.as_str(), e))?;
            let slot = allocator.allocate_video(frame_count);
            debug!(
                "Planned video '{}' as id {} with images {:?}",
                folder_name,
                slot.video_id,
                slot.image_ids()
            );

            plans.push(VideoPlan {
                folder,
                folder_name,
                slot,
                game_info,
                sequence_info,
            });
        }

        Ok(plans)
    }

    fn read_metadata(&self, folder: &Path) -> Result<(InformationFile, InformationFile, u64)> {
        let game_info = InformationFile::new(self.layout.game_info_path(folder))?;
        let sequence_info = InformationFile::new(self.layout.sequence_info_path(folder))?;
        let frame_count = sequence_info.number_or_default("seqLength")?;
        Ok((game_info, sequence_info, frame_count))
    }

    /// Parse one planned video into its tables.
    pub fn ingest(&self, plan: &VideoPlan) -> Result<VideoTables> {
        let slot = plan.slot;
        let video = video_record(slot, &plan.game_info, &plan.sequence_info)?;

        let mut roles: BTreeMap<i64, TrackletRole> = BTreeMap::new();
        let mut categories = Vec::with_capacity(video.num_tracklets as usize);
        for index in 1..=video.num_tracklets {
            let descriptor = plan.game_info.search(&format!("trackletID_{}", index))?;
            let role = TrackletRole::resolve(index, descriptor)?;
            categories.push(role.category.clone());
            roles.insert(i64::from(index), role);
        }

        let ground_truth = GroundTruthFile::new_with(
            self.layout.ground_truth_path(&plan.folder),
            slot.frame_count,
            self.layout.allow_offscreen_boxes,
        )?;
        let detections = ground_truth
            .into_rows()
            .into_iter()
            .map(|row| -> Result<Detection> {
                let role = roles
                    .get(&row.track_id)
                    .ok_or(Error::UndeclaredTracklet { track_id: row.track_id })?;
                Ok(Detection {
                    id: 0,
                    image_id: slot.image_id(row.frame - 1),
                    video_id: slot.video_id,
                    track_id: row.track_id,
                    person_id: row.track_id,
                    bbox_ltwh: row.bbox_ltwh,
                    bbox_conf: row.bbox_conf,
                    class: row.class,
                    visibility: 1,
                    team: role.team,
                    role: Some(role.role),
                    jersey_number: role.jersey_number,
                    position: role.position.clone(),
                    category: Some(role.category.clone()),
                    category_id: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for track_id in roles.keys() {
            if !detections.iter().any(|d| d.track_id == *track_id) {
                warn!(
                    "Tracklet {} of video '{}' has no detections",
                    track_id, plan.folder_name
                );
            }
        }

        let images = (0..slot.frame_count)
            .map(|frame| -> Result<Image> {
                let file_path = self.layout.image_path(&plan.folder, frame);
                if self.layout.require_images && !file_path.is_file() {
                    return Err(Error::MissingFile(file_path));
                }
                Ok(Image {
                    id: slot.image_id(frame),
                    video_id: slot.video_id,
                    frame,
                    file_path,
                    is_labeled: true,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Ingested video '{}': {} images, {} detections, {} tracklets",
            plan.folder_name,
            images.len(),
            detections.len(),
            roles.len()
        );

        Ok(VideoTables {
            video,
            images,
            detections,
            categories,
        })
    }

    /// Merge per-video tables, in the given order, into one tracking set.
    pub fn reduce(tables: Vec<VideoTables>) -> Result<TrackingSet> {
        let taxonomy = Taxonomy::from_names(
            tables
                .iter()
                .flat_map(|t| t.categories.iter().map(String::as_str)),
        );

        let mut set = TrackingSet::default();
        for table in tables {
            let mut video = table.video;
            video.categories = taxonomy.categories().to_vec();
            set.videos.push(video);
            set.images.extend(table.images);
            set.detections.extend(table.detections);
        }

        for (index, detection) in set.detections.iter_mut().enumerate() {
            detection.id = index as u64;
            let name = detection.category.as_deref().unwrap_or_default();
            let category_id = taxonomy.id_of(name).ok_or_else(|| {
                Error::Integrity(format!(
                    "detection {} has category '{}' outside the taxonomy",
                    index, name
                ))
            })?;
            detection.category_id = Some(category_id);
        }

        set.validate()?;
        Ok(set)
    }
}

/// Sub-directories of `split_dir`, sorted by name.
fn video_folders(split_dir: &Path) -> Result<Vec<PathBuf>> {
    if !split_dir.is_dir() {
        return Err(Error::MissingFile(split_dir.to_path_buf()));
    }
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(split_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(folders)
}

/// Split a `"<half> - <mm:ss>"` game time into (half, time).
///
/// An absent key yields `(0, "")`.
fn game_time(info: &InformationFile, key: &str) -> Result<(i64, String)> {
    let Some(value) = info.get(key) else {
        return Ok((0, String::new()));
    };
    let malformed = |message: String| Error::MalformedConfig {
        path: info.path().to_string(),
        message,
    };
    let (half, time) = value
        .split_once(" - ")
        .ok_or_else(|| malformed(format!("'{}' is not '<half> - <time>': '{}'", key, value)))?;
    let half: i64 = half
        .trim()
        .parse()
        .map_err(|_| malformed(format!("'{}' has a non-numeric half: '{}'", key, value)))?;
    Ok((half, time.trim().to_string()))
}

fn video_record(
    slot: VideoSlot,
    game_info: &InformationFile,
    sequence_info: &InformationFile,
) -> Result<Video> {
    let (half_period_start, game_time_start) = game_time(game_info, "gameTimeStart")?;
    let (half_period_stop, game_time_stop) = game_time(game_info, "gameTimeStop")?;

    Ok(Video {
        id: slot.video_id,
        name: game_info.string_or_default("name"),
        nframes: slot.frame_count,
        frame_rate: sequence_info.number_or_default("frameRate")?,
        seq_length: slot.frame_count,
        im_width: sequence_info.number_or_default("imWidth")?,
        im_height: sequence_info.number_or_default("imHeight")?,
        game_id: game_info.number_or_default("gameID")?,
        action_position: game_info.number_or_default("actionPosition")?,
        action_class: game_info.string_or_default("actionClass"),
        visibility: game_info.string_or_default("visibility"),
        clip_start: game_info.number_or_default("clipStart")?,
        game_time_start,
        clip_stop: game_info.number_or_default("clipStop")?,
        game_time_stop,
        num_tracklets: game_info.number_or_default("num_tracklets")?,
        half_period_start,
        half_period_stop,
        categories: Vec::new(),
    })
}
