use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use url::Url;

use crate::{
    Error, Result,
    reader::Reader,
    server::{params::PlaylistParams, state::AppState},
    writer::GENERATED_HEADER_TAGS,
};

/// Handle GET /playlist requests.
pub async fn handle_playlist(
    State(state): State<AppState>,
    Query(params): Query<PlaylistParams>,
) -> Result<Response> {
    tracing::info!("Playlist request: {}", params.url);

    let url = Url::parse(&params.url)?;

    if let Some(window) = params.window
        && !(window.is_finite() && window > 0.0)
    {
        return Err(Error::InvalidParameter {
            name: "window",
            reason: format!("expected a positive number of seconds, got {}", window),
        });
    }

    let content = state.client.fetch_text(url.as_str()).await?;
    let body = regenerate(&url, &content, &params);

    Ok((
        [(header::CONTENT_TYPE, "application/vnd.apple.mpegurl")],
        body,
    )
        .into_response())
}

/// Read fetched playlist text and render it again.
///
/// Upstream copies of the header directives the writer derives are dropped,
/// so the output always starts with a fresh #EXTM3U block.
fn regenerate(url: &Url, content: &str, params: &PlaylistParams) -> String {
    let mut skipped = 0usize;
    let mut reader = Reader::new(url.as_str()).with_diagnostics(|_| skipped += 1);
    if let Some(playlist_type) = params.playlist_type {
        reader = reader.playlist_type(playlist_type);
    }
    if let Some(window) = params.window {
        reader = reader.sliding_window(window);
    }
    let mut playlist = reader.read_str(content);
    drop(reader);

    for name in GENERATED_HEADER_TAGS {
        playlist.remove_tag(name);
    }

    let body = playlist.to_m3u8();

    tracing::debug!(
        version = playlist.version(),
        skipped,
        "Regenerated playlist:\n{}",
        body
    );

    body
}
