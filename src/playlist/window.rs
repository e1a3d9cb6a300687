use super::{Playlist, PlaylistType};
use crate::{hls::PlaylistItem, writer::MEDIA_SEQUENCE_TAG};

impl Playlist {
    /// Drop the oldest valid files of a live playlist until the remaining
    /// ones fit in the sliding window.
    ///
    /// A window shorter than a single file empties the playlist of files.
    /// Evicting drops any stored #EXT-X-MEDIA-SEQUENCE header tag, which no
    /// longer matches the first remaining file.
    pub(super) fn enforce_sliding_window(&mut self) {
        if self.playlist_type != PlaylistType::Live {
            return;
        }
        let Some(window) = self.sliding_window_duration else {
            return;
        };

        while self.total_duration > window {
            let Some(index) = self
                .items
                .iter()
                .position(PlaylistItem::is_valid_media_file)
            else {
                break;
            };

            self.items.remove(index);
            self.removed_file_count += 1;
            self.refresh_total_duration();
            self.header_tags.remove(MEDIA_SEQUENCE_TAG);

            tracing::debug!(
                removed = self.removed_file_count,
                total_duration = self.total_duration,
                window,
                "Evicted file from sliding window"
            );
        }
    }
}
