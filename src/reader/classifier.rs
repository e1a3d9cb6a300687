/// Represents the type of a line in an M3U8 playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Whitespace,
    /// `#` line that is not an HLS directive.
    Comment,
    MediaInfo,
    StreamInfo,
    EndList,
    Key,
    ByteRange,
    /// Any other `#EXT` directive.
    Tag,
    Uri,
}

/// Classifier for M3U8 lines.
pub struct LineClassifier;

impl LineClassifier {
    /// Classify a line from an M3U8 playlist.
    pub fn classify(line: &str) -> LineType {
        let line = line.trim();

        if line.is_empty() {
            return LineType::Whitespace;
        }

        if !line.starts_with('#') {
            return LineType::Uri;
        }

        if !line.starts_with("#EXT") {
            LineType::Comment
        } else if line.starts_with("#EXTINF") {
            LineType::MediaInfo
        } else if line.starts_with("#EXT-X-STREAM-INF") || line.starts_with("#EXT-STREAM-INF") {
            LineType::StreamInfo
        } else if line.starts_with("#EXT-X-ENDLIST") || line.starts_with("#EXT-ENDLIST") {
            LineType::EndList
        } else if line.starts_with("#EXT-X-KEY:") {
            LineType::Key
        } else if line.starts_with("#EXT-X-BYTERANGE:") {
            LineType::ByteRange
        } else {
            LineType::Tag
        }
    }
}
