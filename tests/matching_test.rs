use plsyncli::matching::*;
use plsyncli::types::RawTargetTrack;

// Helper function to create a target-side raw track
fn create_raw_track(title: &str, artist: &str, video_id: &str) -> RawTargetTrack {
    RawTargetTrack {
        title: title.to_lowercase(),
        artist: artist.to_lowercase(),
        video_id: Some(video_id.to_string()),
    }
}

#[test]
fn test_normalize_track_key_format() {
    let key = normalize_track_key("Song Title", "Some Artist");
    assert_eq!(key, "song title|some artist");
}

#[test]
fn test_normalize_is_idempotent() {
    let key = normalize_track_key("Song (Live) [2011 Remaster]", "The Artist feat. Guest");
    let (title, artist) = key.split_once('|').unwrap();

    // Normalizing an already-normalized key changes nothing
    assert_eq!(normalize_track_key(title, artist), key);
}

#[test]
fn test_normalize_strips_noise() {
    // Case, parentheticals and suffix markers must not affect the key
    assert_eq!(
        normalize_track_key("Song (Live)", "Artist"),
        normalize_track_key("song", "ARTIST"),
    );
    assert_eq!(
        normalize_track_key("Song - Remastered 2011", "Artist"),
        normalize_track_key("Song", "Artist"),
    );
    assert_eq!(
        normalize_track_key("Song feat. Somebody Else", "Artist"),
        normalize_track_key("Song", "Artist"),
    );
    assert_eq!(
        normalize_track_key("Song [Radio Edit]", "Artist"),
        normalize_track_key("Song", "Artist"),
    );
}

#[test]
fn test_normalize_keeps_text_after_unbalanced_bracket() {
    // A bracket that never closes removes nothing; the stray bracket itself
    // falls to the punctuation pass
    assert_eq!(
        normalize_track_key("foo (bar", "Artist"),
        normalize_track_key("foo bar", "Artist"),
    );
    assert_eq!(
        normalize_track_key("foo [bar", "Artist"),
        normalize_track_key("foo bar", "Artist"),
    );
    // Closed spans around it are still removed
    assert_eq!(
        normalize_track_key("foo (live) (bar", "Artist"),
        normalize_track_key("foo bar", "Artist"),
    );
}

#[test]
fn test_normalize_handles_empty_input() {
    // Total function: empty input yields an empty-but-valid key
    assert_eq!(normalize_track_key("", ""), "|");
    assert_eq!(normalize_track_key("Song", ""), "song|");
}

#[test]
fn test_normalize_strips_punctuation_and_collapses_whitespace() {
    assert_eq!(
        normalize_track_key("Don't  Stop,   Believin'!", "Journey"),
        "dont stop believin|journey"
    );
}

#[test]
fn test_threshold_boundaries() {
    let thresholds = MatchThresholds::default();

    // Exactly 0.85 name similarity matches regardless of artist
    assert!(thresholds.is_match(0.85, 0.0));

    // Just below both bars does not match
    assert!(!thresholds.is_match(0.84, 0.59));

    // Exactly at the dual bar matches
    assert!(thresholds.is_match(0.70, 0.60));

    // Name below the weak bar never matches on artist alone
    assert!(!thresholds.is_match(0.69, 1.0));
}

#[test]
fn test_similarity_ratio_range() {
    assert_eq!(similarity("same text", "same text"), 1.0);

    let ratio = similarity("hello world", "hello word");
    assert!(ratio > 0.0 && ratio < 1.0);
}

#[test]
fn test_fuzzy_match_finds_close_titles() {
    let targets = vec![
        create_raw_track("Bohemian Rhapsody (Remastered 2011)", "Queen", "v1"),
        create_raw_track("Stairway to Heaven", "Led Zeppelin", "v2"),
    ];

    assert!(find_fuzzy_match(
        "Bohemian Rhapsody",
        "Queen",
        &targets,
        &MatchThresholds::default(),
    ));
    assert!(!find_fuzzy_match(
        "Completely Different Song",
        "Nobody Ever",
        &targets,
        &MatchThresholds::default(),
    ));
}

#[test]
fn test_fuzzy_match_empty_target_list() {
    assert!(!find_fuzzy_match(
        "Anything",
        "Anyone",
        &[],
        &MatchThresholds::default(),
    ));
}

#[test]
fn test_fuzzy_match_respects_custom_thresholds() {
    let targets = vec![create_raw_track("Bohemian Rhapsody", "Queen", "v1")];

    // Impossible thresholds turn off matching even for identical text
    let strict = MatchThresholds {
        name: 1.1,
        artist: 1.1,
        strong_name: 1.1,
    };
    assert!(!find_fuzzy_match("Bohemian Rhapsody", "Queen", &targets, &strict));
}
