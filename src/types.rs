use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A published map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Beatmap {
    #[serde(rename = "_id")]
    pub id: String,
    /// Hex key used in `maps/detail/{key}` and votes.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub uploader: User,
    pub metadata: Metadata,
    pub stats: Stats,
    /// Download link that skips the download counter.
    pub direct_download: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    #[serde(rename = "coverURL")]
    pub cover_url: String,
    /// SHA1 of the map contents.
    pub hash: String,
}

impl Beatmap {
    /// Last path segment of the cover URL.
    pub fn cover_filename(&self) -> &str {
        self.cover_url
            .rsplit('/')
            .next()
            .unwrap_or(self.cover_url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub song_name: String,
    #[serde(default)]
    pub song_sub_name: String,
    pub song_author_name: String,
    pub level_author_name: String,
    /// Audio length in seconds.
    #[serde(default)]
    pub duration: u32,
    pub bpm: f64,
    pub difficulties: Difficulties,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Difficulties {
    pub easy: bool,
    pub normal: bool,
    pub hard: bool,
    pub expert: bool,
    pub expert_plus: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Characteristic {
    pub name: String,
    /// Keyed by difficulty name; `None` when the map lacks that difficulty.
    pub difficulties: HashMap<String, Option<CharacteristicDifficulty>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CharacteristicDifficulty {
    /// Length in beats.
    pub duration: f64,
    /// Length in seconds.
    pub length: u32,
    pub bombs: u32,
    pub notes: u32,
    pub obstacles: u32,
    pub njs: f64,
    #[serde(rename = "njsOffset")]
    pub njs_offset: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub downloads: u64,
    pub plays: u64,
    pub up_votes: u64,
    pub down_votes: u64,
    pub rating: f64,
    pub heat: f64,
}

/// Error payload returned by the API on rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestError {
    pub code: i64,
    pub identifier: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_beatmap() {
        let map: Beatmap = serde_json::from_value(fixtures::beatmap_json("ff9")).unwrap();
        assert_eq!(map.key, "ff9");
        assert_eq!(map.id, "id-ff9");
        assert_eq!(map.description, None);
        assert_eq!(map.uploader.username, "mapper");
        assert!(map.metadata.difficulties.hard);
        assert_eq!(map.stats.up_votes, 3);
        assert_eq!(map.download_url, "/api/download/key/ff9");
        let standard = &map.metadata.characteristics[0];
        assert_eq!(standard.difficulties["easy"], None);
        assert_eq!(standard.difficulties["normal"].unwrap().notes, 320);
    }

    #[test]
    fn cover_filename_is_last_segment() {
        let map: Beatmap = serde_json::from_value(fixtures::beatmap_json("ff9")).unwrap();
        assert_eq!(map.cover_filename(), "abc123.jpg");
    }

    #[test]
    fn decodes_rest_error() {
        let err: RestError =
            serde_json::from_str(r#"{"code":401,"identifier":"ERR_INVALID_TICKET"}"#).unwrap();
        assert_eq!(err.identifier, "ERR_INVALID_TICKET");
    }
}
