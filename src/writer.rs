pub mod byterange_tracker;
pub mod key_tracker;

use std::io::Write;

pub use byterange_tracker::ByteRangeTracker;
pub use key_tracker::KeyTracker;

use crate::{
    Result,
    hls::PlaylistItem,
    playlist::{Playlist, PlaylistType, infer_version},
};

pub const HEADER_TAG: &str = "#EXTM3U";
pub const VERSION_TAG: &str = "#EXT-X-VERSION";
pub const PLAYLIST_TYPE_TAG: &str = "#EXT-X-PLAYLIST-TYPE";
pub const MEDIA_SEQUENCE_TAG: &str = "#EXT-X-MEDIA-SEQUENCE";
pub const TARGET_DURATION_TAG: &str = "#EXT-X-TARGETDURATION";
pub const END_LIST_TAG: &str = "#EXT-X-ENDLIST";

/// Header directives the writer derives from the playlist model.
pub const GENERATED_HEADER_TAGS: [&str; 5] = [
    HEADER_TAG,
    VERSION_TAG,
    PLAYLIST_TYPE_TAG,
    MEDIA_SEQUENCE_TAG,
    TARGET_DURATION_TAG,
];

const DEFAULT_TARGET_DURATION: f64 = 10.0;

/// Serializes a playlist to M3U8 text.
///
/// Key and byte-range state is reset on every call to [`Writer::write`].
#[derive(Debug, Default)]
pub struct Writer {
    keys: KeyTracker,
    byteranges: ByteRangeTracker,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the playlist to `sink` and return the inferred version.
    ///
    /// Invalid items and header tags are skipped; only sink errors fail.
    pub fn write<W: Write>(&mut self, playlist: &Playlist, sink: &mut W) -> Result<u32> {
        self.keys = KeyTracker::new();
        self.byteranges = ByteRangeTracker::new();
        let version = infer_version(playlist);

        self.write_header(playlist, version, sink)?;

        let mut lines = 0usize;
        for item in playlist.items().iter().filter(|item| item.is_valid()) {
            if let PlaylistItem::MediaFile(file) = item {
                if let Some(line) = self.keys.next_line(file) {
                    writeln!(sink, "{}", line)?;
                }
                if let Some(line) = self.byteranges.next_line(file) {
                    writeln!(sink, "{}", line)?;
                }
            }
            writeln!(sink, "{}", item.render())?;
            lines += 1;
        }

        let has_files = playlist.files().next().is_some();
        if has_files && (playlist.final_media_file || playlist.playlist_type == PlaylistType::Vod) {
            writeln!(sink, "{}", END_LIST_TAG)?;
        }

        tracing::debug!(version, items = lines, "Wrote playlist");

        Ok(version)
    }

    fn write_header<W: Write>(
        &self,
        playlist: &Playlist,
        version: u32,
        sink: &mut W,
    ) -> Result<()> {
        let overridden = |name: &str| playlist.header_tags().contains(name);
        let has_files = playlist.files().next().is_some();

        if !overridden(HEADER_TAG) {
            writeln!(sink, "{}", HEADER_TAG)?;
        }

        if !overridden(VERSION_TAG) && version > 1 {
            writeln!(sink, "{}:{}", VERSION_TAG, version)?;
        }

        if !overridden(PLAYLIST_TYPE_TAG)
            && let Some(value) = playlist.playlist_type.as_tag_value()
        {
            writeln!(sink, "{}:{}", PLAYLIST_TYPE_TAG, value)?;
        }

        if !overridden(MEDIA_SEQUENCE_TAG)
            && has_files
            && playlist.playlist_type == PlaylistType::Live
        {
            writeln!(sink, "{}:{}", MEDIA_SEQUENCE_TAG, playlist.media_sequence())?;
        }

        if !overridden(TARGET_DURATION_TAG) && has_files {
            let max_duration = playlist
                .valid_files()
                .filter_map(|file| file.duration)
                .reduce(f64::max)
                .unwrap_or(DEFAULT_TARGET_DURATION);
            writeln!(sink, "{}:{}", TARGET_DURATION_TAG, max_duration.ceil() as u64)?;
        }

        for tag in playlist.header_tags().iter().filter(|tag| tag.is_valid()) {
            writeln!(sink, "{}", tag.render())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hls::{MediaFile, Tag, VariantStream};

    fn render(playlist: &Playlist) -> String {
        let mut out = Vec::new();
        Writer::new().write(playlist, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_playlist() {
        assert_eq!(render(&Playlist::new()), "#EXTM3U\n");
    }

    #[test]
    fn test_live_media_playlist() {
        let mut playlist = Playlist::new();
        playlist.final_media_file = false;
        playlist.initial_media_sequence = 4;
        playlist.add_file(MediaFile::new("a.ts", 10.0));
        playlist.add_file(MediaFile::new("b.ts", 8.0));

        assert_eq!(
            render(&playlist),
            "#EXTM3U\n\
             #EXT-X-MEDIA-SEQUENCE:4\n\
             #EXT-X-TARGETDURATION:10\n\
             #EXTINF:10,\na.ts\n\
             #EXTINF:8,\nb.ts\n"
        );
    }

    #[test]
    fn test_vod_playlist_gets_end_marker() {
        let mut playlist = Playlist::new();
        playlist.playlist_type = PlaylistType::Vod;
        playlist.final_media_file = false;
        playlist.add_file(MediaFile::new("a.ts", 9.2));

        assert_eq!(
            render(&playlist),
            "#EXTM3U\n\
             #EXT-X-VERSION:3\n\
             #EXT-X-PLAYLIST-TYPE:VOD\n\
             #EXT-X-TARGETDURATION:10\n\
             #EXTINF:9.2,\na.ts\n\
             #EXT-X-ENDLIST\n"
        );
    }

    #[test]
    fn test_event_playlist_without_end_marker() {
        let mut playlist = Playlist::new();
        playlist.playlist_type = PlaylistType::Event;
        playlist.final_media_file = false;
        playlist.add_file(MediaFile::new("a.ts", 3.0));

        let out = render(&playlist);
        assert!(out.contains("#EXT-X-PLAYLIST-TYPE:EVENT\n"));
        assert!(!out.contains(MEDIA_SEQUENCE_TAG));
        assert!(!out.contains(END_LIST_TAG));
    }

    #[test]
    fn test_user_tags_override_generated_headers() {
        let mut playlist = Playlist::new();
        playlist.add_tag(Tag::new("#EXT-X-TARGETDURATION", Some("12".into())));
        playlist.add_tag(Tag::new("#EXT-X-ALLOW-CACHE", Some("NO".into())));
        playlist.add_tag(Tag::default());
        playlist.add_file(MediaFile::new("a.ts", 10.0));

        assert_eq!(
            render(&playlist),
            "#EXTM3U\n\
             #EXT-X-MEDIA-SEQUENCE:0\n\
             #EXT-X-TARGETDURATION:12\n\
             #EXT-X-ALLOW-CACHE:NO\n\
             #EXTINF:10,\na.ts\n\
             #EXT-X-ENDLIST\n"
        );
    }

    #[test]
    fn test_target_duration_without_valid_files() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("", 30.0));
        let out = render(&playlist);
        assert!(out.contains("#EXT-X-TARGETDURATION:10\n"));
        assert!(!out.contains("#EXTINF"));
    }

    #[test]
    fn test_invalid_items_are_skipped() {
        let mut playlist = Playlist::new();
        playlist.add_stream(VariantStream::new("hi.m3u8", 1280000));
        playlist.add_stream(VariantStream::default());
        playlist.add_comment("master");

        assert_eq!(
            render(&playlist),
            "#EXTM3U\n\
             #EXT-X-STREAM-INF:BANDWIDTH=1280000\nhi.m3u8\n\
             # master\n"
        );
    }

    #[test]
    fn test_key_line_written_once_for_shared_key() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("1.ts", 10.0).with_key("http://k").with_iv("0x1"));
        playlist.add_file(MediaFile::new("2.ts", 10.0).with_key("http://k").with_iv("0x1"));

        let out = render(&playlist);
        assert_eq!(out.matches("#EXT-X-KEY").count(), 1);
        assert!(out.contains(
            "#EXT-X-KEY:METHOD=AES-128,URI=\"http://k\",IV=0x1\n#EXTINF:10,\n1.ts\n#EXTINF:10,\n2.ts\n"
        ));
        assert!(out.contains("#EXT-X-VERSION:2\n"));
    }

    #[test]
    fn test_byterange_lines_interleaved() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("a.ts", 10.0).with_byterange(1000, Some(0)));
        playlist.add_file(MediaFile::new("a.ts", 10.0).with_byterange(500, None));
        playlist.add_file(MediaFile::new("a.ts", 10.0).with_byterange(200, Some(5000)));

        let out = render(&playlist);
        assert!(out.contains("#EXT-X-VERSION:4\n"));
        assert!(out.contains(
            "#EXT-X-BYTERANGE:1000@0\n#EXTINF:10,\na.ts\n\
             #EXT-X-BYTERANGE:500\n#EXTINF:10,\na.ts\n\
             #EXT-X-BYTERANGE:200@5000\n#EXTINF:10,\na.ts\n"
        ));
    }

    #[test]
    fn test_key_line_precedes_byterange_line() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("a.ts", 10.0).with_key("k").with_byterange(10, None));
        let out = render(&playlist);
        assert!(out.contains(
            "#EXT-X-KEY:METHOD=AES-128,URI=\"k\"\n#EXT-X-BYTERANGE:10@0\n#EXTINF:10,\na.ts\n"
        ));
    }

    #[test]
    fn test_trackers_reset_between_writes() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("a.ts", 10.0).with_key("k"));
        let mut writer = Writer::new();

        let mut first = Vec::new();
        writer.write(&playlist, &mut first).unwrap();
        let mut second = Vec::new();
        writer.write(&playlist, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_body_tag_written_in_place() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("a.ts", 10.0));
        playlist.add_body_tag(Tag::new("#EXT-X-DISCONTINUITY", None));
        playlist.add_file(MediaFile::new("b.ts", 10.0));

        let out = render(&playlist);
        assert!(out.contains("a.ts\n#EXT-X-DISCONTINUITY\n#EXTINF:10,\nb.ts\n"));
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut playlist = Playlist::new();
        playlist.add_file(MediaFile::new("a.ts", 10.0));

        let result = Writer::new().write(&playlist, &mut FailingSink);
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
