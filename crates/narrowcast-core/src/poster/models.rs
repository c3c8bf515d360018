use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

/// How the progress footer is drawn while a poster is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterMode {
    #[default]
    Normal,
    Minimal,
    Hidden,
}

/// Type-specific payload of a poster, tagged by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PosterContent {
    Image {
        #[serde(default)]
        source: Vec<String>,
    },
    Photo {
        #[serde(default)]
        albums: Vec<u64>,
    },
    Video {
        #[serde(default)]
        source: Vec<String>,
    },
    External {
        #[serde(default)]
        source: Vec<String>,
    },
    /// Poster types this player does not know about; the shell decides what to draw
    #[serde(other)]
    Unknown,
}

/// One slide in the rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poster {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display time in seconds
    #[serde(rename = "timeout")]
    pub timeout_seconds: f64,
    #[serde(default)]
    pub footer: FooterMode,
    #[serde(flatten)]
    pub content: PosterContent,
}

impl Poster {
    /// How long the poster stays up before playback moves on.
    ///
    /// `None` means the poster must never be auto-advanced: the timeout is not
    /// positive, not finite, or too large to represent as a [`Duration`].
    pub fn advance_after(&self) -> Option<Duration> {
        if self.timeout_seconds > 0.0 {
            Duration::try_from_secs_f64(self.timeout_seconds).ok()
        } else {
            None
        }
    }

    /// Album ids for photo posters
    pub fn photo_albums(&self) -> Option<&[u64]> {
        match &self.content {
            PosterContent::Photo { albums } => Some(albums),
            _ => None,
        }
    }
}

/// Response of the poster list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterList {
    #[serde(default)]
    pub posters: Vec<Poster>,
    #[serde(default)]
    pub borrel_mode: bool,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
