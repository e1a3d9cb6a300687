use crate::hls::{ByteRange, MediaFile};

/// Decides whether a media file's #EXT-X-BYTERANGE line needs an explicit
/// offset or can continue the previous range.
#[derive(Debug, Clone, Default)]
pub struct ByteRangeTracker {
    last_end: Option<u64>,
}

impl ByteRangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the next media file, returning its byte-range line, if any.
    pub fn next_line(&mut self, file: &MediaFile) -> Option<String> {
        let Some(length) = file.byterange else {
            self.last_end = None;
            return None;
        };

        let offset = match (file.byterange_offset, self.last_end) {
            (Some(offset), last_end) if Some(offset) != last_end => Some(offset),
            (_, None) => Some(0),
            _ => None,
        };

        self.last_end = offset.or(self.last_end).and_then(|start| start.checked_add(length));

        Some(ByteRange::new(length, offset).to_string())
    }
}
