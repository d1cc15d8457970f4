//! Row types of the video, image and detection tables.
//!
//! Field declaration order is the canonical column order: serde serializes
//! struct fields in declaration order, and each type lists the same order in
//! its `COLUMNS` constant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::Category;

/// Bounding box as (left, top, width, height).
///
/// Serialized as a plain 4-element array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BboxLtwh {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BboxLtwh {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the box satisfies `left, top >= 0` and `width, height > 0`.
    pub fn is_valid(&self) -> bool {
        self.left >= 0.0 && self.top >= 0.0 && self.has_area()
    }

    /// Whether `width, height > 0`, whatever the position.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.left, self.top, self.width, self.height]
    }
}

impl From<[f64; 4]> for BboxLtwh {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BboxLtwh> for [f64; 4] {
    fn from(b: BboxLtwh) -> Self {
        b.to_array()
    }
}

/// Team side of a player or goalkeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Left,
    Right,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Left => "left",
            Team::Right => "right",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Goalkeeper,
    Player,
    Referee,
    Ball,
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Goalkeeper => "goalkeeper",
            Role::Player => "player",
            Role::Referee => "referee",
            Role::Ball => "ball",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One video sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Video {
    /// 1-based ordinal in sorted folder order
    pub id: u64,
    pub name: String,
    pub nframes: u64,
    pub frame_rate: u32,
    pub seq_length: u64,
    pub im_width: u32,
    pub im_height: u32,
    pub game_id: i64,
    pub action_position: i64,
    pub action_class: String,
    pub visibility: String,
    pub clip_start: i64,
    pub game_time_start: String,
    pub clip_stop: i64,
    pub game_time_stop: String,
    pub num_tracklets: u32,
    pub half_period_start: i64,
    pub half_period_stop: i64,
    /// Global taxonomy, attached to every video
    pub categories: Vec<Category>,
}

impl Video {
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "nframes",
        "frame_rate",
        "seq_length",
        "im_width",
        "im_height",
        "game_id",
        "action_position",
        "action_class",
        "visibility",
        "clip_start",
        "game_time_start",
        "clip_stop",
        "game_time_stop",
        "num_tracklets",
        "half_period_start",
        "half_period_stop",
        "categories",
    ];
}

/// One frame of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Globally unique, contiguous across videos
    pub id: u64,
    pub video_id: u64,
    /// 0-based frame index within the video
    pub frame: u64,
    pub file_path: PathBuf,
    pub is_labeled: bool,
}

impl Image {
    pub const COLUMNS: &'static [&'static str] =
        &["id", "video_id", "frame", "file_path", "is_labeled"];
}

/// One annotated bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Dense 0-based row index over the whole detection table
    pub id: u64,
    pub image_id: u64,
    pub video_id: u64,
    /// Tracklet identifier, unique only within a video
    pub track_id: i64,
    pub person_id: i64,
    pub bbox_ltwh: BboxLtwh,
    pub bbox_conf: f64,
    pub class: i64,
    pub visibility: u8,
    pub team: Option<Team>,
    pub role: Option<Role>,
    pub jersey_number: Option<u32>,
    pub position: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<u64>,
}

impl Detection {
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "image_id",
        "video_id",
        "track_id",
        "person_id",
        "bbox_ltwh",
        "bbox_conf",
        "class",
        "visibility",
        "team",
        "role",
        "jersey_number",
        "position",
        "category",
        "category_id",
    ];
}
