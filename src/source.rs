use crate::error::{Result, SyncError};
use crate::library::LibraryEntry;
use crate::parser::Parser;
use crate::timeline::CaptionTimeline;

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::{debug, warn};

/// Anything that can hand over the raw text of a caption file.
pub trait CaptionSource {
    fn fetch(&self, path: &str) -> Result<String>;
}

/// Serves a library from a local directory tree.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists `dir` relative to the root, sorted by name.
    pub fn list(&self, dir: &str) -> Result<Vec<LibraryEntry>> {
        let full = self.resolve(dir)?;
        let mut entries = Vec::new();
        for item in fs::read_dir(&full)? {
            let item = item?;
            let meta = item.metadata()?;
            let modified = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs().to_string())
                .unwrap_or_default();
            entries.push(LibraryEntry {
                name: item.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                is_dir: meta.is_dir(),
                modified,
                sign: None,
                thumb: None,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(dir, count = entries.len(), "listed directory");
        Ok(entries)
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SyncError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl CaptionSource for FsSource {
    fn fetch(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        let bytes = fs::read(&full)?;
        String::from_utf8(bytes).map_err(|e| SyncError::CaptionUnavailable {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Builds the timeline for a track. A missing caption file or a failed
/// fetch yields an empty timeline.
pub fn load_timeline<S>(source: &S, caption: Option<&str>, parser: &Parser) -> CaptionTimeline
where
    S: CaptionSource + ?Sized,
{
    let Some(path) = caption else {
        debug!("track has no caption file");
        return CaptionTimeline::empty();
    };
    match source.fetch(path) {
        Ok(raw) => CaptionTimeline::new(parser.parse(&raw)),
        Err(err) => {
            warn!(path, error = %err, "captions unavailable");
            CaptionTimeline::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineState;

    struct Failing;

    impl CaptionSource for Failing {
        fn fetch(&self, path: &str) -> Result<String> {
            Err(SyncError::CaptionUnavailable {
                path: path.to_string(),
                reason: "download url not resolved".to_string(),
            })
        }
    }

    fn library() -> (tempfile::TempDir, FsSource) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"not really audio").unwrap();
        fs::write(dir.path().join("song.lrc"), "[00:01]one\n[00:02]two\n").unwrap();
        fs::write(dir.path().join("broken.lrc"), [0xffu8, 0xfe, 0x00]).unwrap();
        fs::create_dir(dir.path().join("disc2")).unwrap();
        let source = FsSource::new(dir.path());
        (dir, source)
    }

    #[test]
    fn lists_directory() {
        let (_dir, source) = library();
        let entries = source.list("").unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["broken.lrc", "disc2", "song.lrc", "song.mp3"]);
        assert!(entries[1].is_dir);
        assert_eq!(entries[3].size, 16);
    }

    #[test]
    fn loads_captions() {
        let (_dir, source) = library();
        let tl = load_timeline(&source, Some("song.lrc"), &Parser::new());

        assert_eq!(tl.state(), TimelineState::Populated);
        assert_eq!(tl.len(), 2);
    }

    #[test]
    fn missing_caption_is_empty_timeline() {
        let (_dir, source) = library();
        let parser = Parser::new();

        assert!(load_timeline(&source, None, &parser).is_empty());
        assert!(load_timeline(&source, Some("nope.lrc"), &parser).is_empty());
        assert!(load_timeline(&source, Some("broken.lrc"), &parser).is_empty());
        assert!(load_timeline(&Failing, Some("song.lrc"), &parser).is_empty());
    }

    #[test]
    fn rejects_escaping_paths() {
        let (_dir, source) = library();

        assert!(matches!(
            source.fetch("../etc/passwd"),
            Err(SyncError::InvalidPath(_))
        ));
        assert!(matches!(
            source.fetch("/etc/passwd"),
            Err(SyncError::InvalidPath(_))
        ));
        assert!(source.fetch("./song.lrc").is_ok());
    }
}
