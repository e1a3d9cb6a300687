use super::Playlist;
use crate::hls::{PlaylistItem, Tag};

const BASELINE_VERSION: u32 = 1;

/// Directives that require protocol version 4.
const VERSION_4_DIRECTIVES: &[&str] = &["MEDIA", "I-FRAMES-ONLY"];

/// Compute the lowest protocol version able to express the playlist.
pub fn infer_version(playlist: &Playlist) -> u32 {
    let mut version = BASELINE_VERSION;

    for file in playlist.valid_files() {
        if file.encryption_key_url.as_url().is_some() && file.encryption_iv.is_some() {
            version = version.max(2);
        }
        if !file.has_integral_duration() {
            version = version.max(3);
        }
        if file.byterange.is_some() {
            version = version.max(4);
        }
    }

    let body_tags = playlist.items().iter().filter_map(|item| match item {
        PlaylistItem::Tag(tag) => Some(tag),
        _ => None,
    });
    let needs_v4 = playlist
        .header_tags()
        .iter()
        .chain(body_tags)
        .filter(|tag| tag.is_valid())
        .any(|tag: &Tag| VERSION_4_DIRECTIVES.iter().any(|d| *d == tag.directive()));
    if needs_v4 {
        version = version.max(4);
    }

    version
}
