//! Interactive capture of YouTube Music browser headers.

use std::io::{self, BufRead, Write};

use crate::{
    error, info, success, warning,
    ytmusic::{
        YtMusicClient,
        auth::{BrowserAuth, HeadersManager, parse_browser_headers, validate_headers},
    },
};

pub async fn setup() {
    print_instructions();

    let pasted = match read_pasted_headers() {
        Ok(text) => text,
        Err(e) => {
            error!("Could not read input: {}", e);
        }
    };
    if pasted.trim().is_empty() {
        error!("No headers pasted. Aborting setup.");
    }

    let headers = parse_browser_headers(&pasted);
    let (valid, missing) = validate_headers(&headers);
    if !valid {
        error!(
            "Missing required headers: {}. Copy the full request headers and try again.",
            missing.join(", ")
        );
    }

    let auth = match BrowserAuth::from_headers(&headers) {
        Ok(auth) => auth,
        Err(e) => {
            error!("Could not build credential bundle: {}", e);
        }
    };

    if let Err(e) = HeadersManager::persist(&auth).await {
        error!("Could not save browser headers: {}", e);
    }
    success!("Browser headers saved");

    info!("Verifying the session with a test request...");
    match YtMusicClient::new(auth).check_auth().await {
        Ok(()) => success!("YouTube Music session is working"),
        Err(e) => warning!(
            "Headers saved but the test request failed: {}. They may be stale; re-run setup with a fresh copy.",
            e
        ),
    }
}

fn print_instructions() {
    info!("YouTube Music setup");
    println!();
    println!("  1. Open https://music.youtube.com in your browser, logged in.");
    println!("  2. Open developer tools (F12) and switch to the Network tab.");
    println!("  3. Click around until a POST request to a '/browse' URL appears.");
    println!("  4. Right-click it and choose 'Copy Request Headers'");
    println!("     (Firefox) or 'Copy as cURL (bash)' (Chrome).");
    println!("  5. Paste everything below and finish with an empty line.");
    println!();
}

/// Reads pasted lines from stdin until an empty line follows some content, or
/// until EOF.
fn read_pasted_headers() -> io::Result<String> {
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut text = String::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() && !text.trim().is_empty() {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}
