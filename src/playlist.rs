pub mod headers;
pub mod version;
mod window;

use std::{fs::File, io, path::Path};

use serde::Deserialize;

pub use headers::HeaderTags;
pub use version::infer_version;

use crate::{
    Result,
    hls::{Comment, MediaFile, PlaylistItem, Tag, VariantStream},
    writer::Writer,
};

/// Playback model of a playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistType {
    #[default]
    Live,
    Event,
    Vod,
}

impl PlaylistType {
    /// Parse from #EXT-X-PLAYLIST-TYPE value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EVENT" => Some(Self::Event),
            "VOD" => Some(Self::Vod),
            _ => None,
        }
    }

    /// Value written in #EXT-X-PLAYLIST-TYPE, if the type has one.
    pub fn as_tag_value(&self) -> Option<&'static str> {
        match self {
            Self::Live => None,
            Self::Event => Some("EVENT"),
            Self::Vod => Some("VOD"),
        }
    }
}

/// An HLS playlist: header tags, an ordered body and playlist-level state.
#[derive(Debug, Clone)]
pub struct Playlist {
    header_tags: HeaderTags,
    items: Vec<PlaylistItem>,
    pub playlist_type: PlaylistType,
    version: u32,
    /// Whether the playlist ends with an explicit end-marker.
    pub final_media_file: bool,
    pub initial_media_sequence: u64,
    sliding_window_duration: Option<f64>,
    removed_file_count: u64,
    total_duration: f64,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Playlist {
    pub fn new() -> Self {
        Self {
            header_tags: HeaderTags::new(),
            items: Vec::new(),
            playlist_type: PlaylistType::Live,
            version: 1,
            final_media_file: true,
            initial_media_sequence: 0,
            sliding_window_duration: None,
            removed_file_count: 0,
            total_duration: 0.0,
        }
    }

    pub fn header_tags(&self) -> &HeaderTags {
        &self.header_tags
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    /// Version computed by the last write.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn removed_file_count(&self) -> u64 {
        self.removed_file_count
    }

    /// Sum of the durations of all valid media files.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn sliding_window_duration(&self) -> Option<f64> {
        self.sliding_window_duration
    }

    /// Configure the live sliding window. Non-positive durations disable it.
    ///
    /// The window is enforced on the next file insertion.
    pub fn set_sliding_window_duration(&mut self, duration: Option<f64>) {
        self.sliding_window_duration = duration.filter(|d| *d > 0.0);
    }

    /// Media sequence number of the first file still in the playlist.
    pub fn media_sequence(&self) -> u64 {
        self.initial_media_sequence + self.removed_file_count
    }

    /// Upsert a header tag, keyed by its name.
    pub fn add_tag(&mut self, tag: Tag) {
        self.header_tags.insert(tag);
    }

    /// Append a tag to the body, between media entries.
    pub fn add_body_tag(&mut self, tag: Tag) {
        self.items.push(tag.into());
    }

    pub fn add_file(&mut self, file: MediaFile) {
        self.items.push(file.into());
        self.refresh_total_duration();
        self.enforce_sliding_window();
    }

    pub fn add_stream(&mut self, stream: VariantStream) {
        self.items.push(stream.into());
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.items.push(Comment::new(comment).into());
    }

    pub fn files(&self) -> impl Iterator<Item = &MediaFile> {
        self.items.iter().filter_map(PlaylistItem::as_media_file)
    }

    pub fn valid_files(&self) -> impl Iterator<Item = &MediaFile> {
        self.files().filter(|file| file.is_valid())
    }

    pub fn streams(&self) -> impl Iterator<Item = &VariantStream> {
        self.items.iter().filter_map(PlaylistItem::as_variant_stream)
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.items.iter().filter_map(|item| match item {
            PlaylistItem::Comment(comment) => Some(comment),
            _ => None,
        })
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.files().map(|file| file.path.as_str()).collect()
    }

    pub fn stream_names(&self) -> Vec<&str> {
        self.streams().map(|stream| stream.path.as_str()).collect()
    }

    /// Look up a header tag value.
    ///
    /// `key` is either a directive name (`#EXT-X-ALLOW-CACHE`) or a short
    /// key (`allow_cache`).
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.header_tags
            .get(&normalize_tag_name(key))
            .and_then(|tag| tag.value.as_deref())
    }

    /// Upsert a header tag using the same key normalization as `tag_value`.
    pub fn set_tag(&mut self, key: &str, value: Option<String>) {
        self.add_tag(Tag::new(normalize_tag_name(key), value));
    }

    /// Remove a header tag, returning it if present.
    pub fn remove_tag(&mut self, key: &str) -> Option<Tag> {
        self.header_tags.remove(&normalize_tag_name(key))
    }

    /// Render the playlist to text, recording the inferred version.
    pub fn to_m3u8(&mut self) -> String {
        let mut out = Vec::new();
        self.version = Writer::new().write(self, &mut out).unwrap_or(self.version);
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn write_to<W: io::Write>(&mut self, sink: &mut W) -> Result<()> {
        self.version = Writer::new().write(self, sink)?;
        Ok(())
    }

    /// Write the playlist to a file, creating or truncating it.
    pub fn write_to_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = io::BufWriter::new(File::create(path)?);
        self.write_to(&mut file)?;
        io::Write::flush(&mut file)?;
        Ok(())
    }

    fn refresh_total_duration(&mut self) {
        self.total_duration = self.valid_files().map(MediaFile::effective_duration).sum();
    }
}

fn normalize_tag_name(key: &str) -> String {
    if key.starts_with('#') {
        return key.to_string();
    }

    let name = key.to_uppercase().replace('_', "-");
    if name.starts_with("EXT") {
        format!("#{}", name)
    } else {
        format!("#EXT-X-{}", name)
    }
}
