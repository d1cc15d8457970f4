//! MOTChallenge text export.

use super::{sorted_by_frame, Prediction, Source};
use crate::{Error, Result};

/// Render the tracked rows of one video in MOTChallenge format.
///
/// Only `Source::Tracked` rows are written, sorted by frame, one line each:
/// `frame, person_id, bb_left, bb_top, bb_width, bb_height, conf, -1, -1, -1`
///
/// Frames are written 1-based. Floats use the shortest representation that
/// parses back to the same value.
///
/// # Arguments
/// * `predictions` - The whole prediction table
/// * `rows` - Indices of the rows belonging to one video
pub fn mot_lines(predictions: &[Prediction], rows: &[usize]) -> Result<String> {
    let mut output = String::new();

    for index in sorted_by_frame(predictions, rows) {
        let prediction = &predictions[index];
        if prediction.source != Source::Tracked {
            continue;
        }
        let person_id = prediction.person_id.ok_or_else(|| {
            Error::InvalidPrediction(format!(
                "tracked row {} of video '{}' has no person_id",
                index, prediction.video_name
            ))
        })?;
        let bbox = prediction.bbox_ltwh;

        output.push_str(&format!(
            "{}, {}, {}, {}, {}, {}, {}, -1, -1, -1\n",
            prediction.frame + 1,
            person_id,
            bbox.left,
            bbox.top,
            bbox.width,
            bbox.height,
            prediction.bbox_conf
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::prediction;

    #[test]
    fn test_only_tracked_rows_sorted_by_frame() {
        let rows = vec![
            prediction("v", 4, Source::Tracked, Some(3)),
            prediction("v", 1, Source::Detection, None),
            prediction("v", 0, Source::Tracked, Some(7)),
            prediction("v", 2, Source::GroundTruth, Some(1)),
        ];
        let text = mot_lines(&rows, &[0, 1, 2, 3]).unwrap();
        assert_eq!(
            text,
            "1, 7, 10, 20, 30, 40, 0.5, -1, -1, -1\n\
             5, 3, 10, 20, 30, 40, 0.5, -1, -1, -1\n"
        );
    }

    #[test]
    fn test_fractional_values_are_exact() {
        let mut row = prediction("v", 0, Source::Tracked, Some(1));
        row.bbox_ltwh.left = 0.1 + 0.2;
        let text = mot_lines(&[row], &[0]).unwrap();
        let left: f64 = text.split(',').nth(2).unwrap().trim().parse().unwrap();
        assert_eq!(left, 0.1 + 0.2);
    }

    #[test]
    fn test_tracked_row_needs_person_id() {
        let rows = vec![prediction("v", 0, Source::Tracked, None)];
        assert!(matches!(
            mot_lines(&rows, &[0]),
            Err(Error::InvalidPrediction(_))
        ));
    }

    #[test]
    fn test_no_tracked_rows_gives_empty_file() {
        let rows = vec![prediction("v", 0, Source::Detection, None)];
        assert_eq!(mot_lines(&rows, &[0]).unwrap(), "");
    }
}
