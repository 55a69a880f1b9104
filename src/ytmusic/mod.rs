//! # YouTube Music Integration Module
//!
//! Target-catalog side of the sync. YouTube Music has no public API; like the
//! web player, this client talks to the internal `youtubei` endpoints using a
//! captured browser session (cookie, authorization and visitor headers). The
//! capture flow lives in [`auth`], the playlist and search operations in
//! [`playlists`].
//!
//! ## Error Handling
//!
//! Responses carry HTTP status codes, so errors are classified structurally
//! first: 401/403 become [`TargetError::Auth`], 404 becomes
//! [`TargetError::NotFound`]. Anything else surfaces as
//! [`TargetError::Api`] with the body retained, leaving the message-substring
//! heuristics to the validator at the true boundary.
//!
//! ## Response Parsing
//!
//! The `youtubei` responses are deeply nested renderer trees whose exact
//! shape shifts between client versions. Rather than mirroring the whole
//! tree in types, [`playlists`] walks the JSON for the few renderer keys it
//! needs and converts them into the typed snapshot entities at the boundary,
//! skipping anything malformed.

pub mod auth;
pub mod playlists;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

pub use auth::BrowserAuth;

const YTM_API_URL: &str = "https://music.youtube.com/youtubei/v1";
const YTM_CLIENT_NAME: &str = "WEB_REMIX";
const YTM_CLIENT_VERSION: &str = "1.20250310.01.00";

/// Typed error for target-catalog operations.
#[derive(Debug)]
pub enum TargetError {
    /// 401/403: the captured browser headers are invalid or expired.
    Auth(String),
    /// 404: the requested playlist does not exist or has been deleted.
    NotFound(String),
    /// Network or protocol failure below the API layer.
    Http(reqwest::Error),
    /// Any other API-level failure, message retained for classification.
    Api(String),
}

impl std::fmt::Display for TargetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetError::Auth(msg) => write!(f, "authentication error: {}", msg),
            TargetError::NotFound(msg) => write!(f, "not found: {}", msg),
            TargetError::Http(e) => write!(f, "http error: {}", e),
            TargetError::Api(msg) => write!(f, "api error: {}", msg),
        }
    }
}

impl std::error::Error for TargetError {}

impl From<reqwest::Error> for TargetError {
    fn from(err: reqwest::Error) -> Self {
        TargetError::Http(err)
    }
}

/// Client for the YouTube Music internal API, authenticated with a captured
/// browser session.
pub struct YtMusicClient {
    http: Client,
    auth: BrowserAuth,
}

impl YtMusicClient {
    pub fn new(auth: BrowserAuth) -> Self {
        Self {
            http: Client::new(),
            auth,
        }
    }

    /// Builds a client from the stored `browser_auth.json` bundle. A missing
    /// bundle is an auth error directing the user to `plsyncli setup`.
    pub async fn from_stored() -> Result<Self, TargetError> {
        let auth = auth::HeadersManager::load().await.map_err(|e| {
            TargetError::Auth(format!(
                "YouTube Music headers not configured ({}). Run: plsyncli setup",
                e
            ))
        })?;
        Ok(Self::new(auth))
    }

    /// Issues a `youtubei` POST with the captured session headers and the
    /// standard client context merged into the body.
    pub(crate) async fn post(&self, endpoint: &str, mut body: Value) -> Result<Value, TargetError> {
        body["context"] = json!({
            "client": {
                "clientName": YTM_CLIENT_NAME,
                "clientVersion": YTM_CLIENT_VERSION,
                "hl": "en",
            },
        });

        let url = format!("{}/{}?alt=json&prettyPrint=false", YTM_API_URL, endpoint);
        let response = self
            .http
            .post(&url)
            .headers(self.auth.header_map())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TargetError::Auth(format!(
                "server returned {} for {}",
                status, endpoint
            )));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(TargetError::NotFound(format!(
                "server returned 404 for {}",
                endpoint
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TargetError::Api(format!(
                "{} returned {}: {}",
                endpoint,
                status,
                text.chars().take(300).collect::<String>()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(TargetError::from)
    }

    /// Lightweight authentication probe: a one-result search. Used before
    /// validation so expired headers never get mistaken for deleted
    /// playlists.
    pub async fn check_auth(&self) -> Result<(), TargetError> {
        self.search_songs("test", 1).await.map(|_| ())
    }
}
