//! Catalog loading from host JSON, end to end through a session

mod common;

use common::{id, make_ready, Call, MockEngine};
use waveline_player::{Catalog, PlayerConfig, PlayerError, PlayerSession};

const BASE_URL: &str = "https://audio.example.com";

const TRACKS_JSON: &str = r#"[
    {
        "title": "Meditate",
        "artist": "yokram",
        "album": "offerings [vol 1]",
        "art": "art-offerings-vol-1",
        "timestamps": [
            { "time": 0, "label": "intro" },
            { "time": 24.7, "label": "main melody & beat" },
            { "time": 106, "label": "shuffle beat" }
        ]
    },
    {
        "title": "Cruise",
        "artist": "yokram",
        "album": "offerings [vol 1]",
        "art": "art-offerings-vol-1",
        "timestamps": []
    },
    {
        "title": "Low Tide – Reprise",
        "artist": "yokram",
        "album": "b-sides",
        "art": "art-b-sides",
        "spotifyUrl": "https://open.spotify.com/track/abc"
    },
    {
        "title": "Meditate",
        "artist": "yokram",
        "album": "offerings [vol 1]",
        "art": "art-offerings-vol-1"
    }
]"#;

#[test]
fn host_json_builds_ordered_catalog() {
    let catalog = Catalog::from_json(TRACKS_JSON, BASE_URL).unwrap();

    assert_eq!(catalog.len(), 4);
    let ids: Vec<_> = catalog.iter().map(|t| t.id.as_str().to_string()).collect();
    assert_eq!(ids, ["track-0", "track-1", "track-2", "track-3"]);

    // Duplicate titles still get distinct ids
    assert_eq!(catalog.get(&id(0)).unwrap().title, "Meditate");
    assert_eq!(catalog.get(&id(3)).unwrap().title, "Meditate");

    let reprise = catalog.get(&id(2)).unwrap();
    assert_eq!(
        reprise.audio_url,
        "https://audio.example.com/Low+Tide+%E2%80%93+Reprise"
    );
    assert_eq!(reprise.art_url, "https://audio.example.com/art-b-sides");
    assert_eq!(
        reprise.spotify_url.as_deref(),
        Some("https://open.spotify.com/track/abc")
    );
    assert!(reprise.timestamps.is_empty());

    let meditate = catalog.get(&id(0)).unwrap();
    assert_eq!(meditate.timestamps.len(), 3);
    assert_eq!(meditate.timestamps[1].time, 24.7);
    assert_eq!(meditate.timestamps[1].label, "main melody & beat");
}

#[test]
fn album_listing_keeps_catalog_order() {
    let catalog = Catalog::from_json(TRACKS_JSON, BASE_URL).unwrap();

    let offerings: Vec<_> = catalog
        .by_album("offerings [vol 1]")
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(offerings, vec![id(0), id(1), id(3)]);
    assert!(catalog.by_album("missing").is_empty());
}

#[test]
fn track_without_title_is_rejected() {
    let json = r#"[{ "title": "Cruise" }, { "artist": "yokram" }]"#;
    let err = Catalog::from_json(json, BASE_URL).unwrap_err();
    assert!(matches!(err, PlayerError::Config { index: 1, .. }));
}

#[test]
fn malformed_json_is_rejected() {
    let err = Catalog::from_json("{ not a list", BASE_URL).unwrap_err();
    assert!(matches!(err, PlayerError::Json(_)));
}

#[test]
fn timestamps_seek_the_loaded_track() {
    let engine = MockEngine::default();
    let catalog = Catalog::from_json(TRACKS_JSON, BASE_URL).unwrap();
    let mut session = PlayerSession::new(catalog, PlayerConfig::default(), engine.clone());

    session.play_pause_toggle(None).unwrap();
    make_ready(&mut session, &engine);
    let instance = session.instance_id().unwrap();

    let shuffle = session.current_track_timestamps().unwrap()[2].time;
    session.seek_to_timestamp(shuffle).unwrap();

    assert!(engine.calls().ends_with(&[
        Call::SetTime(instance, 106.0),
        Call::Play(instance),
    ]));
    assert_eq!(
        engine.calls().first(),
        Some(&Call::Create(
            instance,
            "https://audio.example.com/Meditate".to_string()
        ))
    );
}
