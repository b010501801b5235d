//! File listing values and playable-file detection.

use std::path::Path;

use serde::{Deserialize, Serialize};

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "m4a", "aac", "wav", "ogg", "opus", "ape", "wma", "alac",
];
const CAPTION_EXTENSIONS: &[&str] = &["lrc"];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Audio,
    Caption,
    Other,
}

impl FileKind {
    pub fn of(name: &str) -> Self {
        let ext = match extension(name) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return FileKind::Other,
        };
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Audio
        } else if CAPTION_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Caption
        } else {
            FileKind::Other
        }
    }
}

/// One item of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
}

impl LibraryEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            is_dir: false,
            modified: String::new(),
            sign: None,
            thumb: None,
        }
    }

    pub fn kind(&self) -> FileKind {
        if self.is_dir {
            FileKind::Other
        } else {
            FileKind::of(&self.name)
        }
    }
}

/// An audio file and, when the listing has one, its caption file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub audio: String,
    pub caption: Option<String>,
}

/// Finds the caption file sharing `audio_name`'s stem, ignoring case.
pub fn caption_for<'a>(audio_name: &str, entries: &'a [LibraryEntry]) -> Option<&'a LibraryEntry> {
    let wanted = stem(audio_name).to_lowercase();
    entries
        .iter()
        .filter(|e| e.kind() == FileKind::Caption)
        .find(|e| stem(&e.name).to_lowercase() == wanted)
}

pub fn tracks(entries: &[LibraryEntry]) -> Vec<Track> {
    entries
        .iter()
        .filter(|e| e.kind() == FileKind::Audio)
        .map(|e| Track {
            audio: e.name.clone(),
            caption: caption_for(&e.name, entries).map(|c| c.name.clone()),
        })
        .collect()
}

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

fn extension(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_kind {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(FileKind::of(input), expected);
            }
        )*
        }
    }

    test_kind! {
        test_kind_0: ("song.mp3", FileKind::Audio),
        test_kind_1: ("Song.FLAC", FileKind::Audio),
        test_kind_2: ("a.b.m4a", FileKind::Audio),
        test_kind_3: ("song.lrc", FileKind::Caption),
        test_kind_4: ("SONG.LRC", FileKind::Caption),
        test_kind_5: ("cover.jpg", FileKind::Other),
        test_kind_6: ("README", FileKind::Other),
        test_kind_7: (".lrc", FileKind::Other),
    }

    #[test]
    fn directories_are_never_playable() {
        let mut dir = LibraryEntry::file("album.mp3", 0);
        dir.is_dir = true;
        assert_eq!(dir.kind(), FileKind::Other);
    }

    #[test]
    fn pairs_audio_with_caption_by_stem() {
        let entries = vec![
            LibraryEntry::file("01 Intro.flac", 10),
            LibraryEntry::file("01 intro.LRC", 1),
            LibraryEntry::file("02 Outro.mp3", 10),
            LibraryEntry::file("cover.jpg", 5),
            LibraryEntry::file("03 Other.lrc", 1),
        ];

        assert_eq!(
            tracks(&entries),
            vec![
                Track {
                    audio: "01 Intro.flac".to_string(),
                    caption: Some("01 intro.LRC".to_string()),
                },
                Track {
                    audio: "02 Outro.mp3".to_string(),
                    caption: None,
                },
            ]
        );
    }

    #[test]
    fn listing_json() {
        let raw = r#"[
            {"name": "a.mp3", "size": 3, "is_dir": false, "modified": "2024-01-01T00:00:00Z", "sign": "abc"},
            {"name": "sub", "is_dir": true}
        ]"#;
        let entries: Vec<LibraryEntry> = serde_json::from_str(raw).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sign.as_deref(), Some("abc"));
        assert_eq!(entries[0].kind(), FileKind::Audio);
        assert!(entries[1].is_dir);
        assert_eq!(entries[1].thumb, None);
    }
}
