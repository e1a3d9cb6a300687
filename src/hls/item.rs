use super::{key::KeyUrl, stream_info::VariantStream};

pub const MEDIA_INFO_TAG: &str = "#EXTINF";

/// A directive line that is not tied to a media file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Directive name without the `#EXT-X-` prefix.
    pub fn directive(&self) -> &str {
        self.name.strip_prefix("#EXT-X-").unwrap_or(&self.name)
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("{}:{}", self.name, value),
            None => self.name.clone(),
        }
    }
}

/// A media segment entry (#EXTINF line plus its reference line).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFile {
    pub path: String,
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub encryption_key_url: KeyUrl,
    pub encryption_iv: Option<String>,
    pub byterange: Option<u64>,
    pub byterange_offset: Option<u64>,
}

impl MediaFile {
    pub fn new(path: impl Into<String>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration: Some(duration),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_key(mut self, url: impl Into<String>) -> Self {
        self.encryption_key_url = KeyUrl::Url(url.into());
        self
    }

    /// Explicitly switch encryption off from this file on.
    pub fn without_key(mut self) -> Self {
        self.encryption_key_url = KeyUrl::None;
        self
    }

    pub fn with_iv(mut self, iv: impl Into<String>) -> Self {
        self.encryption_iv = Some(iv.into());
        self
    }

    pub fn with_byterange(mut self, length: u64, offset: Option<u64>) -> Self {
        self.byterange = Some(length);
        self.byterange_offset = offset;
        self
    }

    /// Duration counted towards totals; zero when unset or negative.
    pub fn effective_duration(&self) -> f64 {
        self.duration.filter(|d| *d > 0.0).unwrap_or(0.0)
    }

    pub fn has_integral_duration(&self) -> bool {
        self.duration.is_none_or(|d| d.fract() == 0.0)
    }

    pub fn is_valid(&self) -> bool {
        !self.path.is_empty() && self.duration.is_some_and(|d| d >= 0.0)
    }

    pub fn render(&self) -> String {
        let duration = self.duration.unwrap_or_default();
        format!(
            "{}:{},{}\n{}",
            MEDIA_INFO_TAG,
            duration,
            self.description.as_deref().unwrap_or_default(),
            self.path
        )
    }
}

/// A free-form comment line. Only ever produced by callers; the reader
/// discards comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_valid(&self) -> bool {
        true
    }

    pub fn render(&self) -> String {
        format!("# {}", self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Tag,
    MediaFile,
    VariantStream,
    Comment,
}

/// One entry of a playlist body.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistItem {
    Tag(Tag),
    MediaFile(MediaFile),
    VariantStream(VariantStream),
    Comment(Comment),
}

impl PlaylistItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Tag(_) => ItemKind::Tag,
            Self::MediaFile(_) => ItemKind::MediaFile,
            Self::VariantStream(_) => ItemKind::VariantStream,
            Self::Comment(_) => ItemKind::Comment,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Tag(tag) => tag.is_valid(),
            Self::MediaFile(file) => file.is_valid(),
            Self::VariantStream(stream) => stream.is_valid(),
            Self::Comment(comment) => comment.is_valid(),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Tag(tag) => tag.render(),
            Self::MediaFile(file) => file.render(),
            Self::VariantStream(stream) => stream.render(),
            Self::Comment(comment) => comment.render(),
        }
    }

    pub fn as_media_file(&self) -> Option<&MediaFile> {
        match self {
            Self::MediaFile(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_variant_stream(&self) -> Option<&VariantStream> {
        match self {
            Self::VariantStream(stream) => Some(stream),
            _ => None,
        }
    }

    /// True for a media file that passes validation.
    pub fn is_valid_media_file(&self) -> bool {
        self.as_media_file().is_some_and(MediaFile::is_valid)
    }
}

impl From<Tag> for PlaylistItem {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<MediaFile> for PlaylistItem {
    fn from(file: MediaFile) -> Self {
        Self::MediaFile(file)
    }
}

impl From<VariantStream> for PlaylistItem {
    fn from(stream: VariantStream) -> Self {
        Self::VariantStream(stream)
    }
}

impl From<Comment> for PlaylistItem {
    fn from(comment: Comment) -> Self {
        Self::Comment(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_render() {
        assert_eq!(
            Tag::new("#EXT-X-ALLOW-CACHE", Some("NO".into())).render(),
            "#EXT-X-ALLOW-CACHE:NO"
        );
        assert_eq!(
            Tag::new("#EXT-X-DISCONTINUITY", None).render(),
            "#EXT-X-DISCONTINUITY"
        );
        assert_eq!(Tag::new("#EXT-X-MEDIA", None).directive(), "MEDIA");
        assert!(!Tag::default().is_valid());
    }

    #[test]
    fn test_media_file_render() {
        let file = MediaFile::new("seg1.ts", 10.0);
        assert_eq!(file.render(), "#EXTINF:10,\nseg1.ts");

        let file = MediaFile::new("seg2.ts", 9.009).with_description("intro");
        assert_eq!(file.render(), "#EXTINF:9.009,intro\nseg2.ts");
    }

    #[test]
    fn test_media_file_validity() {
        assert!(MediaFile::new("a.ts", 0.0).is_valid());
        assert!(!MediaFile::new("", 1.0).is_valid());
        assert!(!MediaFile::new("a.ts", -1.0).is_valid());
        let no_duration = MediaFile {
            path: "a.ts".into(),
            ..Default::default()
        };
        assert!(!no_duration.is_valid());
    }

    #[test]
    fn test_integral_duration() {
        assert!(MediaFile::new("a.ts", 10.0).has_integral_duration());
        assert!(!MediaFile::new("a.ts", 10.5).has_integral_duration());
    }

    #[test]
    fn test_item_kind_dispatch() {
        let item = PlaylistItem::from(Comment::new("hello"));
        assert_eq!(item.kind(), ItemKind::Comment);
        assert_eq!(item.render(), "# hello");
        assert!(item.is_valid());
        assert!(item.as_media_file().is_none());
    }
}
