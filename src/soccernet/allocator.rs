//! Identifier allocation across videos.
//!
//! Video and image ids are allocated per video, in sorted folder order, before
//! any ground truth is parsed. Detection ids are not allocated here: they are
//! the dense row index of the final concatenated detection table.

/// Identifiers reserved for one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSlot {
    /// 1-based video ordinal
    pub video_id: u64,
    /// Id of the video's first image; frame `f` has id `image_offset + f`
    pub image_offset: u64,
    pub frame_count: u64,
}

impl VideoSlot {
    /// Global image id of a 0-based frame.
    pub fn image_id(&self, frame: u64) -> u64 {
        self.image_offset + frame
    }

    /// Image ids reserved for this video.
    pub fn image_ids(&self) -> std::ops::Range<u64> {
        self.image_offset..self.image_offset + self.frame_count
    }
}

/// Running counters for one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierAllocator {
    next_image_id: u64,
    videos_allocated: u64,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next video ordinal and `frame_count` image ids.
    pub fn allocate_video(&mut self, frame_count: u64) -> VideoSlot {
        self.videos_allocated += 1;
        let slot = VideoSlot {
            video_id: self.videos_allocated,
            image_offset: self.next_image_id,
            frame_count,
        };
        self.next_image_id += frame_count;
        slot
    }

    /// Total number of image ids handed out so far.
    pub fn images_allocated(&self) -> u64 {
        self.next_image_id
    }

    pub fn videos_allocated(&self) -> u64 {
        self.videos_allocated
    }
}
