//! Browser session capture for YouTube Music.
//!
//! YouTube Music offers no OAuth flow for third parties; instead the user
//! copies the request headers of an authenticated `browse` call out of their
//! browser's developer tools. [`parse_browser_headers`] accepts both the
//! Firefox "Copy Request Headers" format and the Chrome "Copy as cURL (bash)"
//! format, [`validate_headers`] checks the bundle is complete, and
//! [`HeadersManager`] persists it as `browser_auth.json` in the data
//! directory.

use std::{collections::HashMap, path::PathBuf};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Header names that must be present for playlist operations to work.
pub const REQUIRED_HEADERS: &[&str] =
    &["cookie", "authorization", "x-goog-authuser", "x-goog-visitor-id"];

/// The captured browser-session credential bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserAuth {
    pub accept: String,
    #[serde(rename = "accept-language")]
    pub accept_language: String,
    #[serde(rename = "content-type")]
    pub content_type: String,
    pub cookie: String,
    #[serde(rename = "user-agent")]
    pub user_agent: String,
    #[serde(rename = "x-goog-authuser")]
    pub x_goog_authuser: String,
    #[serde(rename = "x-goog-visitor-id")]
    pub x_goog_visitor_id: String,
    pub authorization: String,
    pub origin: String,
}

impl BrowserAuth {
    /// Builds the bundle from parsed headers, defaulting the fields browsers
    /// don't always include in a copy.
    ///
    /// Callers should run [`validate_headers`] first; missing required
    /// headers are reported as an error here as well.
    pub fn from_headers(headers: &HashMap<String, String>) -> Result<Self, String> {
        let (valid, missing) = validate_headers(headers);
        if !valid {
            return Err(format!("missing required headers: {}", missing.join(", ")));
        }

        let get_or = |key: &str, default: &str| {
            headers
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Ok(BrowserAuth {
            accept: get_or("accept", "*/*"),
            accept_language: get_or("accept-language", "en-US,en;q=0.9"),
            content_type: get_or("content-type", "application/json"),
            cookie: headers["cookie"].clone(),
            user_agent: get_or(
                "user-agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
            x_goog_authuser: get_or("x-goog-authuser", "0"),
            x_goog_visitor_id: headers["x-goog-visitor-id"].clone(),
            authorization: headers["authorization"].clone(),
            origin: get_or("origin", "https://music.youtube.com"),
        })
    }

    /// The bundle as reqwest headers for an authenticated request. Values
    /// that fail header encoding are skipped rather than failing the call.
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let pairs = [
            ("accept", &self.accept),
            ("accept-language", &self.accept_language),
            ("content-type", &self.content_type),
            ("cookie", &self.cookie),
            ("user-agent", &self.user_agent),
            ("x-goog-authuser", &self.x_goog_authuser),
            ("x-goog-visitor-id", &self.x_goog_visitor_id),
            ("authorization", &self.authorization),
            ("origin", &self.origin),
        ];

        for (name, value) in pairs {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.insert(name, value);
            }
        }

        map
    }
}

/// Parses pasted request headers into a lower-cased name/value map.
///
/// Handles two capture formats:
/// 1. cURL bash: `-H 'name: value'` flags plus an optional `-b 'cookie'`
/// 2. Raw lines: `Name: Value` as Firefox copies them
///
/// The raw-line pass also runs when the cURL pass misses critical headers,
/// preferring the longer value when both formats yield the same name.
pub fn parse_browser_headers(text: &str) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::new();
    let text = text.trim();

    // METHOD 1: cURL bash format (-H 'name: value')
    for flag in ["-H '", "-H \""] {
        let quote = flag.chars().last().unwrap();
        let mut rest = text;
        while let Some(start) = rest.find(flag) {
            rest = &rest[start + flag.len()..];
            let Some(end) = rest.find(quote) else { break };
            if let Some((key, value)) = rest[..end].split_once(':') {
                headers.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
            rest = &rest[end + 1..];
        }
    }

    // METHOD 1b: cURL cookie flag (-b 'cookie')
    for flag in ["-b '", "-b \""] {
        let quote = flag.chars().last().unwrap();
        if let Some(start) = text.find(flag) {
            let rest = &text[start + flag.len()..];
            if let Some(end) = rest.find(quote) {
                headers.insert("cookie".to_string(), rest[..end].trim().to_string());
            }
        }
    }

    // METHOD 2: raw "Name: Value" lines, when cURL parsing didn't cover it
    if headers.is_empty() || !headers.contains_key("x-goog-visitor-id") {
        for line in text.lines() {
            if line.starts_with("curl") || !line.contains(':') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim().to_string();
            // Only capture if not already found or value is longer
            if headers.get(&key).map_or(true, |v| value.len() > v.len()) {
                headers.insert(key, value);
            }
        }
    }

    headers
}

/// Checks the required headers are present. Returns the validity flag plus
/// the list of missing names for reporting.
pub fn validate_headers(headers: &HashMap<String, String>) -> (bool, Vec<String>) {
    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|key| !headers.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    (missing.is_empty(), missing)
}

pub struct HeadersManager;

impl HeadersManager {
    pub async fn load() -> Result<BrowserAuth, String> {
        let path = Self::auth_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }

    pub async fn persist(auth: &BrowserAuth) -> Result<(), String> {
        let path = Self::auth_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(auth).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub fn is_configured() -> bool {
        Self::auth_path().is_file()
    }

    fn auth_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("plsyncli/browser_auth.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_curl_format() {
        let text = concat!(
            "curl 'https://music.youtube.com/youtubei/v1/browse' \\\n",
            "  -H 'authorization: SAPISIDHASH abc123' \\\n",
            "  -H 'x-goog-authuser: 0' \\\n",
            "  -H 'x-goog-visitor-id: CgtWaXNpdG9ySWQ%3D' \\\n",
            "  -b 'VISITOR_INFO1_LIVE=xyz; SAPISID=secret'",
        );

        let headers = parse_browser_headers(text);
        assert_eq!(headers["authorization"], "SAPISIDHASH abc123");
        assert_eq!(headers["x-goog-authuser"], "0");
        assert_eq!(headers["cookie"], "VISITOR_INFO1_LIVE=xyz; SAPISID=secret");
        let (valid, missing) = validate_headers(&headers);
        assert!(valid, "missing: {:?}", missing);
    }

    #[test]
    fn parses_raw_header_lines() {
        let text = concat!(
            "Cookie: VISITOR_INFO1_LIVE=xyz; SAPISID=secret\n",
            "Authorization: SAPISIDHASH abc123\n",
            "X-Goog-AuthUser: 0\n",
            "X-Goog-Visitor-Id: CgtWaXNpdG9ySWQ%3D\n",
        );

        let headers = parse_browser_headers(text);
        let (valid, missing) = validate_headers(&headers);
        assert!(valid, "missing: {:?}", missing);
        assert_eq!(headers["x-goog-visitor-id"], "CgtWaXNpdG9ySWQ%3D");
    }

    #[test]
    fn reports_missing_headers() {
        let headers = parse_browser_headers("Authorization: SAPISIDHASH abc123");
        let (valid, missing) = validate_headers(&headers);
        assert!(!valid);
        assert!(missing.contains(&"cookie".to_string()));
        assert!(missing.contains(&"x-goog-visitor-id".to_string()));
    }
}
