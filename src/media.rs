//! # Media Discovery
//!
//! Filesystem discovery of benchmark source units and frame extraction.
//! A source unit is either a directory of pre-extracted video frames or a
//! standalone image file; the payload pool turns each unit into one
//! request payload. Discovery is injected behind [`FrameSource`] so tests
//! and alternative media pipelines can swap the filesystem out.

use crate::config::MediaKind;
use crate::error::BenchError;
use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One discoverable unit of source media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUnit {
    /// A directory of ordered still frames extracted from one video.
    FrameDir(PathBuf),
    /// A single standalone image file.
    ImageFile(PathBuf),
}

impl SourceUnit {
    /// Display name used in logs.
    pub fn name(&self) -> String {
        match self {
            SourceUnit::FrameDir(path) | SourceUnit::ImageFile(path) => {
                path.display().to_string()
            }
        }
    }
}

/// The media discovery capability consumed by the payload pool.
///
/// `discover` returns the ordered listing of source units under the
/// configured root; `frames` returns the ordered encoded image bytes for
/// one unit together with the MIME type of each frame.
pub trait FrameSource: Send + Sync {
    fn discover(&self) -> Result<Vec<SourceUnit>, BenchError>;
    fn frames(&self, unit: &SourceUnit) -> Result<Vec<Frame>, BenchError>;
}

/// A single encoded still image.
#[derive(Debug, Clone)]
pub struct Frame {
    pub bytes: Bytes,
    pub mime: &'static str,
}

/// # Filesystem Frame Source
///
/// Walks a media root on the local filesystem. In `Frames` mode every
/// directory directly containing at least one image file becomes a unit
/// (frames sorted by file name, truncated to `max_frames`); in `Images`
/// mode every image file is its own unit.
pub struct FsFrameSource {
    root: PathBuf,
    kind: MediaKind,
    max_frames: usize,
}

impl FsFrameSource {
    pub fn new(root: impl Into<PathBuf>, kind: MediaKind, max_frames: usize) -> Self {
        Self {
            root: root.into(),
            kind,
            max_frames,
        }
    }
}

fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| {
                IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str())
            })
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Image files directly inside `dir`, sorted by file name.
fn image_files_in(dir: &Path) -> Result<Vec<PathBuf>, BenchError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BenchError::Preload(format!("failed to read {}: {}", dir.display(), e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_image_file(path))
        .collect();
    files.sort();
    Ok(files)
}

impl FrameSource for FsFrameSource {
    /// Discover source units under the root. A missing root is not an
    /// error: discovery completes with zero units and the pool stays
    /// empty, which every worker then treats as terminal.
    fn discover(&self) -> Result<Vec<SourceUnit>, BenchError> {
        if !self.root.exists() {
            warn!("media root does not exist: {}", self.root.display());
            return Ok(Vec::new());
        }

        let mut units = Vec::new();
        match self.kind {
            MediaKind::Frames => {
                for entry in WalkDir::new(&self.root)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_dir())
                {
                    let dir = entry.path();
                    let has_frames = image_files_in(dir).map(|f| !f.is_empty()).unwrap_or(false);
                    if has_frames {
                        units.push(SourceUnit::FrameDir(dir.to_path_buf()));
                    }
                }
            }
            MediaKind::Images => {
                for entry in WalkDir::new(&self.root)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    if is_image_file(entry.path()) {
                        units.push(SourceUnit::ImageFile(entry.path().to_path_buf()));
                    }
                }
            }
        }

        // WalkDir order is platform dependent; sort for a stable rotor cycle.
        units.sort_by_key(|u| match u {
            SourceUnit::FrameDir(p) | SourceUnit::ImageFile(p) => p.clone(),
        });

        debug!(
            "discovered {} source units under {}",
            units.len(),
            self.root.display()
        );
        Ok(units)
    }

    fn frames(&self, unit: &SourceUnit) -> Result<Vec<Frame>, BenchError> {
        match unit {
            SourceUnit::FrameDir(dir) => {
                let mut files = image_files_in(dir)?;
                files.truncate(self.max_frames);

                let mut frames = Vec::with_capacity(files.len());
                for file in files {
                    match fs::read(&file) {
                        Ok(bytes) => frames.push(Frame {
                            mime: mime_for(&file),
                            bytes: Bytes::from(bytes),
                        }),
                        Err(e) => {
                            // A single unreadable frame does not sink the unit.
                            warn!("failed to load frame {}: {}", file.display(), e);
                        }
                    }
                }

                if frames.is_empty() {
                    return Err(BenchError::Preload(format!(
                        "no readable frames in {}",
                        dir.display()
                    )));
                }
                Ok(frames)
            }
            SourceUnit::ImageFile(file) => {
                let bytes = fs::read(file).map_err(|e| {
                    BenchError::Preload(format!("failed to read {}: {}", file.display(), e))
                })?;
                Ok(vec![Frame {
                    mime: mime_for(file),
                    bytes: Bytes::from(bytes),
                }])
            }
        }
    }
}
