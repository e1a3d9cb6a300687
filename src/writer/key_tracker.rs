use crate::hls::{
    KeyMethod, KeyUrl, MediaFile,
    key::{KEY_TAG, format_iv, quote_uri},
};

/// Key state last announced to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TrackedKey {
    /// No #EXT-X-KEY line written yet.
    Unset,
    None,
    Url(String),
}

impl TrackedKey {
    fn matches(&self, url: &KeyUrl) -> bool {
        match (self, url) {
            (Self::None, KeyUrl::None) => true,
            (Self::Url(tracked), KeyUrl::Url(url)) => tracked == url,
            _ => false,
        }
    }
}

/// Decides when an #EXT-X-KEY line has to precede a media file.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    key: TrackedKey,
    iv: Option<String>,
    sequence: u64,
    default_iv: Option<String>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            key: TrackedKey::Unset,
            iv: None,
            sequence: 0,
            default_iv: None,
        }
    }

    /// IV a player derives for the last processed file when none is given.
    pub fn default_iv(&self) -> Option<&str> {
        self.default_iv.as_deref()
    }

    /// Process the next media file, returning the key line to write
    /// before it, if the key state changes.
    pub fn next_line(&mut self, file: &MediaFile) -> Option<String> {
        self.default_iv = Some(format_iv(self.sequence));
        let mut changed = false;

        if file.encryption_key_url.is_specified() && !self.key.matches(&file.encryption_key_url) {
            self.key = match &file.encryption_key_url {
                KeyUrl::Url(url) => TrackedKey::Url(url.clone()),
                _ => TrackedKey::None,
            };
            changed = true;
        }

        if matches!(self.key, TrackedKey::Url(_)) && file.encryption_iv != self.iv {
            self.iv = file.encryption_iv.clone();
            changed = true;
        }

        self.sequence += 1;

        if !changed {
            return None;
        }

        let line = match &self.key {
            TrackedKey::Url(url) => {
                let mut attrs = vec![
                    format!("METHOD={}", KeyMethod::Aes128.as_str()),
                    format!("URI={}", quote_uri(url)),
                ];
                if let Some(iv) = &self.iv {
                    attrs.push(format!("IV={}", iv));
                }
                format!("{}:{}", KEY_TAG, attrs.join(","))
            }
            _ => format!("{}:METHOD={}", KEY_TAG, KeyMethod::None.as_str()),
        };

        Some(line)
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> MediaFile {
        MediaFile::new("seg.ts", 10.0)
    }

    #[test]
    fn test_shared_key_written_once() {
        let mut tracker = KeyTracker::new();
        let a = file().with_key("http://k").with_iv("0x1");
        let b = file().with_key("http://k").with_iv("0x1");

        assert_eq!(
            tracker.next_line(&a).as_deref(),
            Some(r#"#EXT-X-KEY:METHOD=AES-128,URI="http://k",IV=0x1"#)
        );
        assert_eq!(tracker.next_line(&b), None);
    }

    #[test]
    fn test_unspecified_key_writes_nothing() {
        let mut tracker = KeyTracker::new();
        assert_eq!(tracker.next_line(&file()), None);
        assert_eq!(tracker.next_line(&file()), None);
    }

    #[test]
    fn test_unspecified_inherits_tracked_key() {
        let mut tracker = KeyTracker::new();
        assert!(tracker.next_line(&file().with_key("http://k")).is_some());
        assert_eq!(tracker.next_line(&file()), None);
    }

    #[test]
    fn test_explicit_none_is_a_change() {
        let mut tracker = KeyTracker::new();
        assert_eq!(
            tracker.next_line(&file().without_key()).as_deref(),
            Some("#EXT-X-KEY:METHOD=NONE")
        );
        assert_eq!(tracker.next_line(&file().without_key()), None);
        assert_eq!(
            tracker.next_line(&file().with_key("k2")).as_deref(),
            Some(r#"#EXT-X-KEY:METHOD=AES-128,URI="k2""#)
        );
        assert_eq!(
            tracker.next_line(&file().without_key()).as_deref(),
            Some("#EXT-X-KEY:METHOD=NONE")
        );
    }

    #[test]
    fn test_iv_change_rewrites_key() {
        let mut tracker = KeyTracker::new();
        tracker.next_line(&file().with_key("http://k").with_iv("0x1"));
        assert_eq!(
            tracker.next_line(&file().with_key("http://k").with_iv("0x2")).as_deref(),
            Some(r#"#EXT-X-KEY:METHOD=AES-128,URI="http://k",IV=0x2"#)
        );
        assert_eq!(
            tracker.next_line(&file().with_key("http://k")).as_deref(),
            Some(r#"#EXT-X-KEY:METHOD=AES-128,URI="http://k""#)
        );
    }

    #[test]
    fn test_iv_ignored_without_key() {
        let mut tracker = KeyTracker::new();
        assert_eq!(tracker.next_line(&file().with_iv("0x1")), None);
    }

    #[test]
    fn test_default_iv_follows_sequence() {
        let mut tracker = KeyTracker::new();
        assert_eq!(tracker.default_iv(), None);
        tracker.next_line(&file());
        assert_eq!(tracker.default_iv(), Some("0x00000000000000000000000000000000"));
        tracker.next_line(&file());
        assert_eq!(tracker.default_iv(), Some("0x00000000000000000000000000000001"));
    }

    #[test]
    fn test_uri_is_escaped() {
        let mut tracker = KeyTracker::new();
        assert_eq!(
            tracker.next_line(&file().with_key(" http://k/\"x\"\n")).as_deref(),
            Some(r#"#EXT-X-KEY:METHOD=AES-128,URI="http://k/%22x%22""#)
        );
    }
}
