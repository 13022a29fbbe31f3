use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stream identifier assigned by the platform.
///
/// YouTube itags are small integers but other platforms hand out strings
/// like `hls-720`, so the value is kept as text and only rendered as a JSON
/// number when the number prints back to the same text (`"018"` stays a
/// string).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Itag(String);

impl Itag {
    pub fn new(value: impl Into<String>) -> Self {
        Itag(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Itag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Itag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_u64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Itag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Itag(n.to_string())),
            Raw::Text(s) if s.trim().is_empty() => {
                Err(serde::de::Error::custom("itag must not be empty"))
            }
            Raw::Text(s) => Ok(Itag(s.trim().to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StreamDescriptor {
    pub itag: Itag,
    pub resolution: String,
    pub mime_type: String,
    pub abr: Option<String>,
    pub filesize: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub struct VideoInfoRequest {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VideoInfoResponse {
    pub streams: Vec<StreamDescriptor>,
}

#[derive(Deserialize, Debug)]
pub struct DownloadRequest {
    pub url: String,
    pub itag: Itag,
}
