//! Ground-truth file reader for the MOTChallenge text format.

use crate::dataset::BboxLtwh;
use crate::{Error, Result};
use std::path::Path;
use std::str::FromStr;

const NUM_COLUMNS: usize = 10;

/// One row of a ground-truth file.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruthRow {
    /// 1-based frame number
    pub frame: u64,
    pub track_id: i64,
    pub bbox_ltwh: BboxLtwh,
    pub bbox_conf: f64,
    pub class: i64,
    /// Raw visibility flag as written in the file
    pub visibility: f64,
}

/// Parsed ground-truth file.
///
/// Reads comma-separated rows without a header:
/// `frame,track_id,left,top,width,height,conf,class,visibility,unused`
///
/// By default boxes must satisfy `left, top >= 0` and `width, height > 0`;
/// `new_with` / `parse_with` can relax the position check.
#[derive(Debug, Clone)]
pub struct GroundTruthFile {
    rows: Vec<GroundTruthRow>,
    num_frames: u64,
}

impl GroundTruthFile {
    /// Read a ground-truth file.
    ///
    /// # Arguments
    /// * `file_path` - Path to the ground-truth file
    /// * `num_frames` - Total number of frames in the sequence; rows outside
    ///   `1..=num_frames` are rejected
    pub fn new<P: AsRef<Path>>(file_path: P, num_frames: u64) -> Result<Self> {
        Self::new_with(file_path, num_frames, false)
    }

    /// Read a ground-truth file, optionally accepting boxes with negative
    /// left/top.
    pub fn new_with<P: AsRef<Path>>(
        file_path: P,
        num_frames: u64,
        allow_offscreen: bool,
    ) -> Result<Self> {
        let file_path = file_path.as_ref();
        if !file_path.is_file() {
            return Err(Error::MissingFile(file_path.to_path_buf()));
        }
        let text = std::fs::read_to_string(file_path)?;
        Self::parse_with(file_path.to_string_lossy(), &text, num_frames, allow_offscreen)
    }

    /// Parse ground-truth text. `path` only labels error messages.
    pub fn parse(path: impl AsRef<str>, text: &str, num_frames: u64) -> Result<Self> {
        Self::parse_with(path, text, num_frames, false)
    }

    pub fn parse_with(
        path: impl AsRef<str>,
        text: &str,
        num_frames: u64,
        allow_offscreen: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut rows = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = parse_row(line, allow_offscreen).map_err(|message| Error::MalformedGroundTruth {
                path: path.to_string(),
                line: line_no + 1,
                message,
            })?;
            if row.frame == 0 || row.frame > num_frames {
                return Err(Error::MalformedGroundTruth {
                    path: path.to_string(),
                    line: line_no + 1,
                    message: format!("frame {} outside 1..={}", row.frame, num_frames),
                });
            }
            rows.push(row);
        }

        Ok(Self { rows, num_frames })
    }

    /// All rows in file order.
    pub fn rows(&self) -> &[GroundTruthRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<GroundTruthRow> {
        self.rows
    }

    /// Rows of one 1-based frame, in file order.
    pub fn rows_in_frame(&self, frame: u64) -> impl Iterator<Item = &GroundTruthRow> {
        self.rows.iter().filter(move |row| row.frame == frame)
    }

    pub fn num_frames(&self) -> u64 {
        self.num_frames
    }
}

fn parse_field<T: FromStr>(parts: &[&str], index: usize, name: &str) -> std::result::Result<T, String> {
    let raw = parts[index].trim();
    raw.parse()
        .map_err(|_| format!("column {} ({}) is not a number: '{}'", index + 1, name, raw))
}

fn parse_row(line: &str, allow_offscreen: bool) -> std::result::Result<GroundTruthRow, String> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != NUM_COLUMNS {
        return Err(format!(
            "expected {} columns, found {}",
            NUM_COLUMNS,
            parts.len()
        ));
    }

    let bbox_ltwh = BboxLtwh::new(
        parse_field(&parts, 2, "left")?,
        parse_field(&parts, 3, "top")?,
        parse_field(&parts, 4, "width")?,
        parse_field(&parts, 5, "height")?,
    );
    let valid = if allow_offscreen {
        bbox_ltwh.has_area()
    } else {
        bbox_ltwh.is_valid()
    };
    if !valid {
        return Err(format!("invalid bounding box {:?}", bbox_ltwh.to_array()));
    }

    Ok(GroundTruthRow {
        frame: parse_field(&parts, 0, "frame")?,
        track_id: parse_field(&parts, 1, "track_id")?,
        bbox_ltwh,
        bbox_conf: parse_field(&parts, 6, "conf")?,
        class: parse_field(&parts, 7, "class")?,
        visibility: parse_field(&parts, 8, "visibility")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "1,1,914,855,55,172,1,-1,-1,-1\n\
                          1,2,1541,606,30,96,1,-1,-1,-1\n\
                          2,1,916.5,853,55,172,1,-1,-1,-1\n";

    #[test]
    fn test_parse_rows() {
        let gt = GroundTruthFile::parse("gt.txt", SAMPLE, 2).unwrap();
        assert_eq!(gt.rows().len(), 3);

        let row = &gt.rows()[2];
        assert_eq!(row.frame, 2);
        assert_eq!(row.track_id, 1);
        assert_relative_eq!(row.bbox_ltwh.left, 916.5, epsilon = 1e-10);
        assert_relative_eq!(row.bbox_ltwh.height, 172.0, epsilon = 1e-10);
        assert_eq!(row.class, -1);

        assert_eq!(gt.rows_in_frame(1).count(), 2);
        assert_eq!(gt.rows_in_frame(3).count(), 0);
    }

    #[test]
    fn test_spaces_after_commas() {
        let gt = GroundTruthFile::parse("gt.txt", "3, 7, 1.5, 2, 10, 20, 0.9, -1, -1, -1\n", 5).unwrap();
        let row = &gt.rows()[0];
        assert_eq!((row.frame, row.track_id), (3, 7));
        assert_relative_eq!(row.bbox_conf, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_column_count() {
        let err = GroundTruthFile::parse("gt.txt", "1,1,914,855,55,172,1\n", 2).unwrap_err();
        match err {
            Error::MalformedGroundTruth { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_frame_out_of_range() {
        assert!(GroundTruthFile::parse("gt.txt", SAMPLE, 1).is_err());
        assert!(GroundTruthFile::parse("gt.txt", "0,1,1,1,1,1,1,-1,-1,-1\n", 5).is_err());
    }

    #[test]
    fn test_rejects_degenerate_box() {
        assert!(GroundTruthFile::parse("gt.txt", "1,1,10,10,0,5,1,-1,-1,-1\n", 1).is_err());
        assert!(GroundTruthFile::parse("gt.txt", "1,1,-3,10,4,5,1,-1,-1,-1\n", 1).is_err());
    }

    #[test]
    fn test_offscreen_boxes_when_allowed() {
        let text = "1,1,-4,10,50,100,1,-1,-1,-1\n";
        assert!(GroundTruthFile::parse("gt.txt", text, 1).is_err());

        let gt = GroundTruthFile::parse_with("gt.txt", text, 1, true).unwrap();
        assert_relative_eq!(gt.rows()[0].bbox_ltwh.left, -4.0, epsilon = 1e-12);

        // size is still checked
        assert!(GroundTruthFile::parse_with("gt.txt", "1,1,-4,10,0,100,1,-1,-1,-1\n", 1, true).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let gt = GroundTruthFile::new(file.path(), 2).unwrap();
        assert_eq!(gt.num_frames(), 2);
        assert_eq!(gt.into_rows().len(), 3);
    }
}
