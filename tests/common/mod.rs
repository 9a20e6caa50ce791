#![allow(dead_code)]

use beatsaver::{BeatSaver, Config, Transport};
use serde_json::{json, Value};

pub fn config_for(base_url: String) -> Config {
    Config::default().with_base_url(base_url)
}

pub fn client_for(base_url: String) -> BeatSaver {
    BeatSaver::new(config_for(base_url)).unwrap()
}

pub fn transport_for(base_url: String) -> Transport {
    Transport::new(config_for(base_url)).unwrap()
}

pub fn beatmap_json(key: &str) -> Value {
    json!({
        "_id": format!("id-{key}"),
        "key": key,
        "name": format!("Map {key}"),
        "description": "desc",
        "uploader": {"_id": "u1", "username": "mapper"},
        "metadata": {
            "songName": "Song",
            "songSubName": "",
            "songAuthorName": "Artist",
            "levelAuthorName": "mapper",
            "duration": 120,
            "bpm": 128.0,
            "difficulties": {"easy": false, "normal": true, "hard": true, "expert": false, "expertPlus": false},
            "characteristics": []
        },
        "stats": {"downloads": 10, "plays": 4, "upVotes": 3, "downVotes": 1, "rating": 0.7, "heat": 12.5},
        "directDownload": format!("/cdn/{key}/abc.zip"),
        "downloadURL": format!("/api/download/key/{key}"),
        "coverURL": "/cdn/ff9/abc123.jpg",
        "hash": format!("hash-{key}")
    })
}

pub fn page_json(keys: &[&str], prev: Option<u32>, next: Option<u32>) -> Value {
    json!({
        "docs": keys.iter().map(|k| beatmap_json(k)).collect::<Vec<_>>(),
        "totalDocs": 60,
        "lastPage": 2,
        "prevPage": prev,
        "nextPage": next
    })
}
