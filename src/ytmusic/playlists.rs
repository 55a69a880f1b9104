//! Playlist and search operations against the YouTube Music internal API.
//!
//! Responses are renderer trees; the parsers here walk the JSON for the few
//! renderer keys the sync needs and convert matches into typed entities at
//! the boundary. Malformed entries are skipped, never fatal.

use serde_json::{Value, json};

use crate::{
    matching::normalize_track_key,
    types::{RawTargetTrack, TargetPlaylist, TargetSnapshot},
    warning,
};

use super::{TargetError, YtMusicClient};

/// `youtubei` search params selecting the "Songs" result shelf.
const SONGS_FILTER_PARAMS: &str = "EgWKAQIIAWoKEAkQBRAKEAMQBA%3D%3D";

/// The contents of a target playlist as returned by a single browse call.
pub struct PlaylistContents {
    /// Track count the playlist header declares, when present. The API may
    /// return fewer tracks than this for very large playlists.
    pub declared_count: Option<u64>,
    pub tracks: Vec<RawTargetTrack>,
}

impl YtMusicClient {
    /// Lists the playlists in the user's library.
    pub async fn list_playlists(&self) -> Result<Vec<TargetPlaylist>, TargetError> {
        let body = self
            .post("browse", json!({"browseId": "FEmusic_liked_playlists"}))
            .await?;

        let mut playlists = Vec::new();
        for item in find_objects(&body, "musicTwoRowItemRenderer") {
            let Some(title) = first_run_text(item.get("title")) else {
                continue;
            };
            let Some(browse_id) = item
                .pointer("/navigationEndpoint/browseEndpoint/browseId")
                .and_then(Value::as_str)
            else {
                continue;
            };
            // Library playlist browse ids are the playlist id with a VL prefix.
            let id = browse_id.strip_prefix("VL").unwrap_or(browse_id);
            if id == "LM" {
                continue; // "Liked Music" auto playlist
            }
            playlists.push(TargetPlaylist {
                id: id.to_string(),
                title,
            });
        }

        Ok(playlists)
    }

    /// Fetches a playlist's raw contents.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistContents, TargetError> {
        let body = self
            .post("browse", json!({"browseId": format!("VL{playlist_id}")}))
            .await?;

        let declared_count = find_first(&body, "trackCount")
            .and_then(parse_count)
            .or_else(|| declared_count_from_header(&body));

        let tracks = find_objects(&body, "musicResponsiveListItemRenderer")
            .into_iter()
            .filter_map(parse_track_item)
            .collect();

        Ok(PlaylistContents {
            declared_count,
            tracks,
        })
    }

    /// Fetches a playlist and builds the three membership shapes the
    /// reconciliation engine consumes: exact video ids, normalized name keys,
    /// and raw records for fuzzy comparison. A declared count larger than the
    /// returned track list logs a truncation warning but is not an error.
    pub async fn get_playlist_snapshot(
        &self,
        playlist_id: &str,
    ) -> Result<TargetSnapshot, TargetError> {
        let contents = self.get_playlist(playlist_id).await?;

        if let Some(declared) = contents.declared_count {
            let actual = contents.tracks.len() as u64;
            if declared > actual {
                warning!(
                    "YT playlist {} declares {} tracks but API returned {}",
                    playlist_id,
                    declared,
                    actual
                );
            }
        }

        let mut snapshot = TargetSnapshot::default();
        for track in contents.tracks {
            if let Some(vid) = &track.video_id {
                snapshot.video_ids.insert(vid.clone());
            }
            snapshot
                .track_keys
                .insert(normalize_track_key(&track.title, &track.artist));
            snapshot.raw_tracks.push(track);
        }

        Ok(snapshot)
    }

    /// Probes a playlist for existence without materializing its contents.
    /// Used by the validator.
    pub async fn probe_playlist(&self, playlist_id: &str) -> Result<(), TargetError> {
        self.post("browse", json!({"browseId": format!("VL{playlist_id}")}))
            .await
            .map(|_| ())
    }

    /// Searches the song catalog, returning up to `limit` video ids in result
    /// order.
    pub async fn search_songs(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, TargetError> {
        let body = self
            .post(
                "search",
                json!({"query": query, "params": SONGS_FILTER_PARAMS}),
            )
            .await?;

        let mut video_ids = Vec::new();
        for item in find_objects(&body, "musicResponsiveListItemRenderer") {
            if let Some(vid) = find_first(item, "videoId").and_then(Value::as_str) {
                if !video_ids.iter().any(|v| v == vid) {
                    video_ids.push(vid.to_string());
                }
            }
            if video_ids.len() >= limit {
                break;
            }
        }

        Ok(video_ids)
    }

    /// Creates a playlist and returns its id.
    pub async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        private: bool,
    ) -> Result<String, TargetError> {
        let body = self
            .post(
                "playlist/create",
                json!({
                    "title": title,
                    "description": description,
                    "privacyStatus": if private { "PRIVATE" } else { "PUBLIC" },
                }),
            )
            .await?;

        body.get("playlistId")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| TargetError::Api("playlist/create returned no playlistId".to_string()))
    }

    /// Adds tracks to a playlist in one batch call.
    pub async fn add_items(
        &self,
        playlist_id: &str,
        video_ids: &[String],
    ) -> Result<(), TargetError> {
        let actions: Vec<Value> = video_ids
            .iter()
            .map(|vid| json!({"action": "ACTION_ADD_VIDEO", "addedVideoId": vid}))
            .collect();

        let body = self
            .post(
                "browse/edit_playlist",
                json!({"playlistId": playlist_id, "actions": actions}),
            )
            .await?;

        match body.get("status").and_then(Value::as_str) {
            Some("STATUS_SUCCEEDED") => Ok(()),
            Some(status) => Err(TargetError::Api(format!(
                "edit_playlist returned {}",
                status
            ))),
            None => Err(TargetError::Api(
                "edit_playlist returned no status".to_string(),
            )),
        }
    }
}

/// Converts one list-item renderer into a raw track record, lower-cased for
/// comparison. Items without a title (ghost rows, unavailable tracks) are
/// dropped; a missing artist falls back to the "unknown" sentinel.
fn parse_track_item(item: &Value) -> Option<RawTargetTrack> {
    let title = flex_column_text(item, 0).filter(|t| !t.is_empty())?;
    let artist = flex_column_text(item, 1).unwrap_or_else(|| "Unknown".to_string());
    let video_id = item
        .pointer("/playlistItemData/videoId")
        .and_then(Value::as_str)
        .map(String::from);

    Some(RawTargetTrack {
        title: title.to_lowercase(),
        artist: artist.to_lowercase(),
        video_id,
    })
}

fn flex_column_text(item: &Value, index: usize) -> Option<String> {
    first_run_text(
        item.pointer(&format!(
            "/flexColumns/{index}/musicResponsiveListItemFlexColumnRenderer/text"
        )),
    )
}

fn first_run_text(text: Option<&Value>) -> Option<String> {
    text?
        .pointer("/runs/0/text")
        .and_then(Value::as_str)
        .map(String::from)
}

/// Reads the declared track count out of the playlist header's second
/// subtitle ("N songs • ...") when no structured count is present.
fn declared_count_from_header(body: &Value) -> Option<u64> {
    let header = find_first(body, "secondSubtitle")?;
    let runs = header.get("runs")?.as_array()?;
    runs.iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .find_map(|text| text.split_whitespace().next()?.replace(',', "").parse().ok())
}

fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.replace(',', "").parse().ok(),
        _ => None,
    }
}

/// Collects every value stored under `key` anywhere in the tree, in document
/// order.
fn find_objects<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    collect_objects(value, key, &mut out);
    out
}

fn collect_objects<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    out.push(v);
                } else {
                    collect_objects(v, key, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_objects(item, key, out);
            }
        }
        _ => {}
    }
}

/// First value stored under `key` anywhere in the tree, depth-first.
fn find_first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    return Some(v);
                }
                if let Some(found) = find_first(v, key) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|item| find_first(item, key)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_item(title: &str, artist: &str, video_id: Option<&str>) -> Value {
        let mut item = json!({
            "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": title}]}}},
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": artist}]}}},
            ],
        });
        if let Some(vid) = video_id {
            item["playlistItemData"] = json!({"videoId": vid});
        }
        item
    }

    #[test]
    fn parses_track_items_defensively() {
        let full = parse_track_item(&track_item("Foo Song", "Bar Artist", Some("v1"))).unwrap();
        assert_eq!(full.title, "foo song");
        assert_eq!(full.artist, "bar artist");
        assert_eq!(full.video_id.as_deref(), Some("v1"));

        let no_vid = parse_track_item(&track_item("Foo", "Bar", None)).unwrap();
        assert!(no_vid.video_id.is_none());

        assert!(parse_track_item(&json!({"flexColumns": []})).is_none());
    }

    #[test]
    fn finds_renderers_in_nested_trees() {
        let body = json!({
            "contents": {"shelf": {"items": [
                {"musicResponsiveListItemRenderer": track_item("A", "B", Some("v1"))},
                {"somethingElse": {}},
                {"musicResponsiveListItemRenderer": track_item("C", "D", Some("v2"))},
            ]}},
        });

        let found = find_objects(&body, "musicResponsiveListItemRenderer");
        assert_eq!(found.len(), 2);
        assert_eq!(
            find_first(&body, "videoId").and_then(Value::as_str),
            Some("v1")
        );
    }

    #[test]
    fn reads_declared_count_from_header_subtitle() {
        let body = json!({
            "header": {"musicDetailHeaderRenderer": {"secondSubtitle": {"runs": [
                {"text": "1,204 songs"},
                {"text": " • "},
                {"text": "70 hours"},
            ]}}},
        });

        assert_eq!(declared_count_from_header(&body), Some(1204));
    }
}
