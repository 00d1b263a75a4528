use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscriptError};

/// `youtu.be/<id>`, `watch?v=<id>` (or `&v=`), `/shorts/<id>`, `/embed/<id>`.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|[?&]v=|/shorts/|/embed/)([A-Za-z0-9_-]{11})")
        .expect("video url pattern is valid")
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// Canonical 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VideoRef(String);

impl VideoRef {
    /// Extract the video id from a URL or accept a bare id.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if BARE_ID.is_match(raw) {
            return Ok(Self(raw.to_string()));
        }

        URL_PATTERN
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|id| Self(id.as_str().to_string()))
            .ok_or_else(|| TranscriptError::InvalidVideoReference {
                input: raw.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoRef {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoRef {
    type Error = TranscriptError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<VideoRef> for String {
    fn from(video: VideoRef) -> Self {
        video.0
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn resolves_every_supported_shape() {
        let inputs = [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123&index=2",
            "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ?feature=share",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
            "dQw4w9WgXcQ",
            "  dQw4w9WgXcQ\n",
        ];

        for input in inputs {
            let video = VideoRef::parse(input).unwrap();
            assert_eq!(video.as_str(), ID, "input: {input}");
        }
    }

    #[test]
    fn keeps_dash_and_underscore_ids() {
        let video = VideoRef::parse("https://youtu.be/a-b_c-d_e-f").unwrap();
        assert_eq!(video.as_str(), "a-b_c-d_e-f");
    }

    #[test]
    fn rejects_malformed_input() {
        let inputs = [
            "",
            "not a url",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/watch?list=PL123",
            "https://youtu.be/short",
            "dQw4w9WgXc",
            "dQw4w9WgXcQQ",
        ];

        for input in inputs {
            let err = VideoRef::parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidVideoReference, "input: {input}");
        }
    }

    #[test]
    fn parses_through_from_str() {
        let video: VideoRef = "https://www.youtube.com/embed/dQw4w9WgXcQ".parse().unwrap();
        assert_eq!(video.to_string(), ID);
    }

    #[test]
    fn deserializing_goes_through_parse() {
        let video: VideoRef = serde_json::from_str(r#""https://youtu.be/dQw4w9WgXcQ""#).unwrap();
        assert_eq!(video.as_str(), ID);
        assert_eq!(serde_json::to_string(&video).unwrap(), format!("\"{ID}\""));

        assert!(serde_json::from_str::<VideoRef>(r#""not-a-video""#).is_err());
    }
}
