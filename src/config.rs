//! On-disk layout of a tracking dataset.
//!
//! Every field has a default matching the SoccerNet tracking release, so an
//! empty TOML document (or `DatasetLayout::default()`) is a valid layout.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File and folder names used to locate per-video data.
///
/// ```toml
/// game_info_file = "gameinfo.ini"
/// sequence_info_file = "seqinfo.ini"
/// ground_truth_file = "gt/gt.txt"
/// image_dir = "img1"
/// image_extension = "jpg"
/// train_split = "train"
/// val_split = "test"
/// require_images = false
/// allow_offscreen_boxes = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLayout {
    /// Game metadata file inside each video folder
    #[serde(default = "default_game_info_file")]
    pub game_info_file: String,

    /// Sequence metadata file inside each video folder
    #[serde(default = "default_sequence_info_file")]
    pub sequence_info_file: String,

    /// Ground-truth MOT file, relative to the video folder
    #[serde(default = "default_ground_truth_file")]
    pub ground_truth_file: String,

    /// Frame image folder, relative to the video folder
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// Frame image extension (without the dot)
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Split folder used for training
    #[serde(default = "default_train_split")]
    pub train_split: String,

    /// Split folder used for validation
    #[serde(default = "default_val_split")]
    pub val_split: String,

    /// Split folder used for testing (skipped when unset)
    #[serde(default)]
    pub test_split: Option<String>,

    /// Fail ingestion when a derived frame image does not exist
    #[serde(default)]
    pub require_images: bool,

    /// Accept ground-truth boxes with negative left/top (partly outside the
    /// frame). Width and height must stay positive either way.
    #[serde(default)]
    pub allow_offscreen_boxes: bool,
}

fn default_game_info_file() -> String {
    "gameinfo.ini".to_string()
}

fn default_sequence_info_file() -> String {
    "seqinfo.ini".to_string()
}

fn default_ground_truth_file() -> String {
    "gt/gt.txt".to_string()
}

fn default_image_dir() -> String {
    "img1".to_string()
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

fn default_train_split() -> String {
    "train".to_string()
}

fn default_val_split() -> String {
    "test".to_string()
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            game_info_file: default_game_info_file(),
            sequence_info_file: default_sequence_info_file(),
            ground_truth_file: default_ground_truth_file(),
            image_dir: default_image_dir(),
            image_extension: default_image_extension(),
            train_split: default_train_split(),
            val_split: default_val_split(),
            test_split: None,
            require_images: false,
            allow_offscreen_boxes: false,
        }
    }
}

impl DatasetLayout {
    /// Parse a layout from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a layout from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        debug!("Loading dataset layout from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn game_info_path(&self, video_folder: &Path) -> PathBuf {
        video_folder.join(&self.game_info_file)
    }

    pub fn sequence_info_path(&self, video_folder: &Path) -> PathBuf {
        video_folder.join(&self.sequence_info_file)
    }

    pub fn ground_truth_path(&self, video_folder: &Path) -> PathBuf {
        video_folder.join(&self.ground_truth_file)
    }

    /// Path of a frame image; `frame` is 0-based, file names are 1-based and
    /// zero-padded to six digits.
    pub fn image_path(&self, video_folder: &Path, frame: u64) -> PathBuf {
        video_folder
            .join(&self.image_dir)
            .join(format!("{:06}.{}", frame + 1, self.image_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let layout = DatasetLayout::from_toml_str("").unwrap();
        assert_eq!(layout, DatasetLayout::default());
        assert_eq!(layout.val_split, "test");
        assert!(layout.test_split.is_none());
        assert!(!layout.allow_offscreen_boxes);
    }

    #[test]
    fn test_partial_override() {
        let layout =
            DatasetLayout::from_toml_str("image_extension = \"png\"\ntest_split = \"challenge\"\n")
                .unwrap();
        assert_eq!(layout.image_extension, "png");
        assert_eq!(layout.test_split.as_deref(), Some("challenge"));
        assert_eq!(layout.ground_truth_file, "gt/gt.txt");
    }

    #[test]
    fn test_invalid_toml() {
        let err = DatasetLayout::from_toml_str("require_images = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "image_dir = \"frames\"").unwrap();
        let layout = DatasetLayout::from_toml_file(file.path()).unwrap();
        assert_eq!(layout.image_dir, "frames");
    }

    #[test]
    fn test_image_path_is_one_based_and_padded() {
        let layout = DatasetLayout::default();
        let path = layout.image_path(Path::new("/data/SNMOT-060"), 0);
        assert_eq!(path, PathBuf::from("/data/SNMOT-060/img1/000001.jpg"));
        let path = layout.image_path(Path::new("/data/SNMOT-060"), 749);
        assert_eq!(path, PathBuf::from("/data/SNMOT-060/img1/000750.jpg"));
    }
}
