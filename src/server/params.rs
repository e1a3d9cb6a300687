use serde::Deserialize;

use crate::playlist::PlaylistType;

/// Query parameters for the /playlist endpoint.
#[derive(Debug, Deserialize)]
pub struct PlaylistParams {
    /// URL of the M3U8 playlist.
    pub url: String,

    /// Sliding window in seconds, applied while the playlist is read.
    #[serde(default)]
    pub window: Option<f64>,

    /// Override for the playlist type: live, event or vod.
    #[serde(default, rename = "type")]
    pub playlist_type: Option<PlaylistType>,
}
