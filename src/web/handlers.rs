use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;
use url::Url;

use super::AppState;
use crate::errors::{AppError, AppResult, SourceError};
use crate::models::Channel;
use crate::proxy::{proxy_playlist, requires_proxy};
use crate::utils::UrlUtils;

const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
const PLAYLIST_ACTION: &str = "playlist.m3u8";
const CHUNK_ACTION: &str = "chunk";

#[derive(Debug, Deserialize)]
pub struct ChunkQuery {
    pub url: Option<String>,
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_channels(State(state): State<AppState>) -> Json<Vec<Channel>> {
    Json(state.channels.all().to_vec())
}

/// `GET /channels/{id}.json`
pub async fn get_channel(
    Path(file_name): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<Channel>> {
    let id = file_name
        .strip_suffix(".json")
        .ok_or_else(|| AppError::not_found("channel", file_name.as_str()))?;
    Ok(Json(state.channels.require(id)?.clone()))
}

/// `GET /stream/{id}` without an action
pub async fn missing_stream_action(Path(_id): Path<String>) -> Response {
    (StatusCode::BAD_REQUEST, "Invalid stream url").into_response()
}

/// `GET /stream/{id}/{action}`
pub async fn stream(
    Path((id, action)): Path<(String, String)>,
    Query(query): Query<ChunkQuery>,
    State(state): State<AppState>,
) -> AppResult<Response> {
    match action.as_str() {
        PLAYLIST_ACTION => {
            let channel = state.channels.require(&id)?;
            if requires_proxy(channel) {
                info!("Fetching main playlist for channel {}", id);
                fetch_playlist(&state, channel, &channel.stream_url).await
            } else {
                info!("Redirecting to main playlist for channel {}", id);
                Ok((StatusCode::FOUND, [(header::LOCATION, channel.stream_url.clone())]).into_response())
            }
        }
        CHUNK_ACTION => {
            let channel = state.channels.require(&id)?;
            let chunk_url = query
                .url
                .ok_or_else(|| AppError::validation("missing url query parameter"))?;
            fetch_chunk(&state, channel, &chunk_url).await
        }
        _ => Ok((StatusCode::BAD_REQUEST, "Invalid stream url").into_response()),
    }
}

async fn fetch_playlist(state: &AppState, channel: &Channel, playlist_url: &str) -> AppResult<Response> {
    let fetched = state
        .fetcher
        .fetch(playlist_url, &channel_headers(channel))
        .await?
        .ensure_success()?;

    let body = proxy_playlist(&fetched.text(), &fetched.final_url);
    Ok(([(header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE)], body).into_response())
}

async fn fetch_chunk(state: &AppState, channel: &Channel, chunk_url: &str) -> AppResult<Response> {
    let parsed = Url::parse(chunk_url)
        .map_err(|e| AppError::validation(format!("invalid chunk url: {e}")))?;

    if parsed.path().ends_with(".m3u8") {
        info!("Fetching chunk playlist for channel {}", channel.id);
        return fetch_playlist(state, channel, chunk_url).await;
    }

    info!("Fetching chunk data for channel {}", channel.id);
    let fetched = state
        .fetcher
        .fetch(chunk_url, &channel_headers(channel))
        .await?;
    if fetched.status != 200 {
        return Err(SourceError::http(fetched.status, UrlUtils::obfuscate_credentials(chunk_url)).into());
    }

    let content_type = fetched
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], Body::from(fetched.bytes)).into_response())
}

fn channel_headers(channel: &Channel) -> Vec<(String, String)> {
    channel
        .headers
        .iter()
        .flatten()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
