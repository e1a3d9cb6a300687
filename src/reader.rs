pub mod classifier;
pub mod parser;

use std::{fs, io::Read, path::Path};

use url::Url;

pub use classifier::{LineClassifier, LineType};

use crate::{
    ParseError, Result,
    hls::{ByteRange, KeyInfo, MediaFile, Tag, VariantStream},
    playlist::{Playlist, PlaylistType},
    writer::{MEDIA_SEQUENCE_TAG, PLAYLIST_TYPE_TAG},
};

/// A line the reader could not parse and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number.
    pub line_number: usize,
    pub line: String,
    pub error: ParseError,
}

/// Callback receiving per-line diagnostics.
pub type DiagnosticSink<'a> = Box<dyn FnMut(LineDiagnostic) + 'a>;

/// True for `scheme://...` references.
pub fn is_absolute_uri(s: &str) -> bool {
    !s.chars().any(char::is_whitespace)
        && s
            .split_once("://")
            .is_some_and(|(scheme, rest)| !scheme.is_empty() && !rest.is_empty())
}

/// Segment state carried from directive lines to the next media file.
#[derive(Debug, Default)]
struct PendingSegment {
    key: Option<KeyInfo>,
    byterange: Option<ByteRange>,
}

/// Builds a [`Playlist`] from M3U8 text.
///
/// Malformed lines are reported to the diagnostic sink and skipped; reading
/// only fails when the source itself cannot be read.
pub struct Reader<'a> {
    base: String,
    base_url: Option<Url>,
    diagnostics: DiagnosticSink<'a>,
    playlist_type: Option<PlaylistType>,
    sliding_window: Option<f64>,
}

impl<'a> Reader<'a> {
    /// Create a reader for a document located at `base`, a URL or a local
    /// path. Relative references are resolved against remote locations only.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base_url = if is_absolute_uri(&base) {
            Url::parse(&base).ok()
        } else {
            None
        };

        Self {
            base,
            base_url,
            diagnostics: Box::new(|_: LineDiagnostic| {}),
            playlist_type: None,
            sliding_window: None,
        }
    }

    pub fn with_diagnostics(mut self, sink: impl FnMut(LineDiagnostic) + 'a) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    /// Force the playlist type, ignoring any #EXT-X-PLAYLIST-TYPE line.
    pub fn playlist_type(mut self, playlist_type: PlaylistType) -> Self {
        self.playlist_type = Some(playlist_type);
        self
    }

    /// Apply a sliding window while files are read.
    pub fn sliding_window(mut self, duration: f64) -> Self {
        self.sliding_window = Some(duration);
        self
    }

    /// Read a local playlist file; its path is the base locator.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Playlist> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Ok(Reader::new(path.to_string_lossy()).read_str(&content))
    }

    pub fn read<R: Read>(&mut self, mut source: R) -> Result<Playlist> {
        let mut content = String::new();
        source.read_to_string(&mut content)?;
        Ok(self.read_str(&content))
    }

    pub fn read_str(&mut self, content: &str) -> Playlist {
        let lines: Vec<&str> = content.lines().collect();

        let mut playlist = Playlist::new();
        if let Some(playlist_type) = self.playlist_type {
            playlist.playlist_type = playlist_type;
        }
        playlist.set_sliding_window_duration(self.sliding_window);

        let mut pending = PendingSegment::default();
        let mut skipped = 0usize;

        for (i, line) in lines.iter().enumerate() {
            if let Err(error) = self.read_line(&mut playlist, &mut pending, &lines, i) {
                tracing::warn!(line = i + 1, %error, "Could not parse line, skipping");
                skipped += 1;
                (self.diagnostics)(LineDiagnostic {
                    line_number: i + 1,
                    line: line.to_string(),
                    error,
                });
            }
        }

        tracing::debug!(
            base = %self.base,
            items = playlist.items().len(),
            header_tags = playlist.header_tags().len(),
            skipped,
            "Read playlist"
        );

        playlist
    }

    fn read_line(
        &self,
        playlist: &mut Playlist,
        pending: &mut PendingSegment,
        lines: &[&str],
        i: usize,
    ) -> std::result::Result<(), ParseError> {
        let line = lines[i];
        match LineClassifier::classify(line) {
            LineType::Tag => {
                let tag = parser::parse_tag(line)?;
                self.apply_playlist_tag(playlist, &tag);
                playlist.add_tag(tag);
            }
            LineType::MediaInfo => {
                let (duration, description) = parser::parse_media_info(line)?;
                let mut file = MediaFile {
                    path: self.reference(lines, i)?,
                    duration: Some(duration),
                    description,
                    ..Default::default()
                };
                if let Some(key) = &pending.key {
                    file.encryption_key_url = key.url.clone();
                    file.encryption_iv = key.iv.clone();
                }
                if let Some(range) = pending.byterange.take() {
                    file.byterange = Some(range.length);
                    file.byterange_offset = range.offset;
                }
                playlist.add_file(file);
                playlist.final_media_file = false;
            }
            LineType::StreamInfo => {
                let mut stream = VariantStream::parse(line)?;
                stream.path = self.reference(lines, i)?;
                playlist.add_stream(stream);
            }
            LineType::EndList => playlist.final_media_file = true,
            LineType::Key => pending.key = Some(KeyInfo::parse(line)?),
            LineType::ByteRange => pending.byterange = Some(ByteRange::parse_from_tag(line)?),
            LineType::Whitespace | LineType::Comment | LineType::Uri => {}
        }

        Ok(())
    }

    fn apply_playlist_tag(&self, playlist: &mut Playlist, tag: &Tag) {
        let Some(value) = tag.value.as_deref() else {
            return;
        };

        match tag.name.as_str() {
            PLAYLIST_TYPE_TAG if self.playlist_type.is_none() => {
                if let Some(playlist_type) = PlaylistType::parse(value) {
                    playlist.playlist_type = playlist_type;
                }
            }
            MEDIA_SEQUENCE_TAG => {
                if let Ok(sequence) = value.trim().parse() {
                    playlist.initial_media_sequence = sequence;
                }
            }
            _ => {}
        }
    }

    /// URI of the entry declared on line `i`, taken from the next line.
    fn reference(&self, lines: &[&str], i: usize) -> std::result::Result<String, ParseError> {
        let path = lines
            .get(i + 1)
            .map(|line| line.trim())
            .ok_or_else(|| ParseError::MissingReference(lines[i].trim().to_string()))?;

        match &self.base_url {
            Some(base) if !is_absolute_uri(path) => base
                .join(path)
                .map(String::from)
                .map_err(|_| ParseError::Unresolvable {
                    base: self.base.clone(),
                    path: path.to_string(),
                }),
            _ => Ok(path.to_string()),
        }
    }
}
