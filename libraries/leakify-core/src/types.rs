//! Domain types shared by every Leakify crate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A song as listed by the backend.
///
/// The filename doubles as the song identifier: likes, recent plays and
/// playback URLs all key on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub filename: String,

    /// Display title
    #[serde(rename = "display")]
    pub title: String,

    #[serde(default)]
    pub artist: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub subfolder: Option<String>,

    /// Category label such as `LEAKED` or `REMASTER`
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tag: Option<String>,

    /// Pre-signed playback URL, when the backend hands one out
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub url: Option<String>,
}

impl Song {
    pub fn new(
        filename: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            artist: artist.into(),
            subfolder: None,
            tag: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = Some(subfolder.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Stable identifier of this song
    pub fn id(&self) -> &str {
        &self.filename
    }
}

/// Compact entry of the recently-played list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub filename: String,
    pub display: String,
    pub artist: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub played_at: DateTime<Utc>,
}

impl SongRecord {
    pub fn from_song(song: &Song, played_at: DateTime<Utc>) -> Self {
        Self {
            filename: song.filename.clone(),
            display: song.title.clone(),
            artist: song.artist.clone(),
            played_at,
        }
    }
}

/// Body of `GET /api/songs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongList {
    pub songs: Vec<Song>,
    #[serde(default)]
    pub count: Option<usize>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_song_deserializes_backend_shape() {
        let json = r#"{
            "display": "Song One",
            "filename": "Artist/Song One.mp3",
            "artist": "Artist",
            "subfolder": "",
            "tag": "LEAKED",
            "url": "/play/Artist%2FSong%20One.mp3"
        }"#;

        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.title, "Song One");
        assert_eq!(song.id(), "Artist/Song One.mp3");
        assert_eq!(song.subfolder, None);
        assert_eq!(song.tag.as_deref(), Some("LEAKED"));
        assert!(song.url.is_some());
    }

    #[test]
    fn test_song_missing_optionals() {
        let json = r#"{"display": "Bare", "filename": "bare.mp3"}"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.artist, "");
        assert_eq!(song.tag, None);
        assert_eq!(song.url, None);
    }

    #[test]
    fn test_song_record_timestamp_is_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let record = SongRecord::from_song(&Song::new("a.mp3", "A", "X"), at);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["played_at"], 1_700_000_000_123_i64);
        assert_eq!(value["display"], "A");

        let back: SongRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_song_list_count_optional() {
        let list: SongList = serde_json::from_str(r#"{"songs": []}"#).unwrap();
        assert!(list.songs.is_empty());
        assert_eq!(list.count, None);
    }
}
