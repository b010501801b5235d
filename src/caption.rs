use serde::{Deserialize, Serialize};

/// A single timed caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// Seconds from the start of the track.
    pub timestamp: f64,
    /// Trimmed line content. Empty for deliberate blank lines.
    pub text: String,
}

impl CaptionEntry {
    pub fn new(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

/// Header tags such as `[ar:Artist]` found while parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub author: Option<String>,
    pub length: Option<String>,
    /// Milliseconds; positive values make lines appear sooner.
    pub offset_ms: Option<i64>,
}

impl Metadata {
    pub(crate) fn set(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "ti" => &mut self.title,
            "ar" => &mut self.artist,
            "al" => &mut self.album,
            "by" => &mut self.author,
            "length" => &mut self.length,
            "offset" => {
                // `+500` is common; i64 parsing accepts the sign.
                return match value.parse() {
                    Ok(ms) => {
                        self.offset_ms = Some(ms);
                        true
                    }
                    Err(_) => false,
                };
            }
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }
}

/// Parse result including header tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionDocument {
    pub metadata: Metadata,
    pub entries: Vec<CaptionEntry>,
}
