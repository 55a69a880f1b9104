use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config::SpotifyConfig,
    types::{
        CurrentUserResponse, PlaylistNameResponse, PlaylistTracksResponse, SpotifyPlaylist, Track,
        UserPlaylistsResponse,
    },
};

/// Fetches the authenticated user's profile. Used as a connection test and
/// for greeting output at the start of a sync.
pub async fn get_current_user(
    token: &str,
    spotify: &SpotifyConfig,
) -> Result<CurrentUserResponse, reqwest::Error> {
    let client = Client::new();
    let response = client
        .get(format!("{}/me", spotify.api_url))
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    response.json::<CurrentUserResponse>().await
}

/// Retrieves all playlists of the authenticated user, following pagination
/// until exhausted.
pub async fn get_user_playlists(
    token: &str,
    spotify: &SpotifyConfig,
) -> Result<Vec<SpotifyPlaylist>, reqwest::Error> {
    let mut playlists = Vec::new();
    let mut url = Some(format!("{}/me/playlists?limit=50", spotify.api_url));

    while let Some(page_url) = url {
        let response = request_with_retry(&page_url, token).await?;
        let page = response.json::<UserPlaylistsResponse>().await?;
        playlists.extend(page.items);
        url = page.next;
    }

    Ok(playlists)
}

/// Looks up a playlist's name.
pub async fn get_playlist_name(
    token: &str,
    spotify: &SpotifyConfig,
    playlist_id: &str,
) -> Result<String, reqwest::Error> {
    let client = Client::new();
    let response = client
        .get(format!(
            "{}/playlists/{}?fields=name",
            spotify.api_url, playlist_id
        ))
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    let body = response.json::<PlaylistNameResponse>().await?;
    Ok(body.name)
}

/// Retrieves all tracks of a playlist, following pagination until exhausted.
///
/// Entries without a usable id or title (tombstoned, unavailable, or local
/// tracks) are skipped rather than failing the fetch. A missing artist list
/// falls back to the "Unknown" sentinel.
pub async fn get_playlist_tracks(
    token: &str,
    spotify: &SpotifyConfig,
    playlist_id: &str,
) -> Result<Vec<Track>, reqwest::Error> {
    let mut tracks = Vec::new();
    let mut url = Some(format!(
        "{}/playlists/{}/tracks?limit=100",
        spotify.api_url, playlist_id
    ));

    while let Some(page_url) = url {
        let response = request_with_retry(&page_url, token).await?;
        let page = response.json::<PlaylistTracksResponse>().await?;

        tracks.extend(
            page.items
                .into_iter()
                .filter_map(|item| item.track)
                .filter_map(|raw| raw.into_track()),
        );

        url = page.next;
    }

    Ok(tracks)
}

/// Issues a GET request, retrying on 502 Bad Gateway and honoring the
/// `Retry-After` header on 429 responses.
async fn request_with_retry(url: &str, token: &str) -> Result<reqwest::Response, reqwest::Error> {
    let client = Client::new();

    loop {
        let response = client.get(url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5);
            sleep(Duration::from_secs(retry_after.min(120))).await;
            continue;
        }

        match response.error_for_status() {
            Ok(valid_response) => return Ok(valid_response),
            Err(err) => {
                if let Some(status) = err.status() {
                    if status == StatusCode::BAD_GATEWAY {
                        sleep(Duration::from_secs(10)).await;
                        continue; // retry
                    }
                }
                return Err(err); // propagate other errors
            }
        }
    }
}
