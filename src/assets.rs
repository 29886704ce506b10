//! Asset discovery, the file picker seam and decoded image storage.

use crate::utils::Size;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tiny_skia::{IntSize, Pixmap};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {width}x{height} cannot be stored")]
    InvalidImage { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Maps,
    Characters,
    Music,
    Sounds,
}

impl AssetKind {
    pub fn subdir(self) -> &'static str {
        match self {
            AssetKind::Maps => "images/maps",
            AssetKind::Characters => "images/characters",
            AssetKind::Music => "music",
            AssetKind::Sounds => "sounds",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AssetKind::Maps | AssetKind::Characters => &["png", "jpg", "jpeg"],
            AssetKind::Music => &["mp3", "ogg", "wav", "flac"],
            AssetKind::Sounds => &["wav", "ogg"],
        }
    }

    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions().contains(&e.as_str())
            })
            .unwrap_or(false)
    }
}

pub trait AssetLoader {
    /// Files of `kind`, sorted by path. A missing directory is an empty list.
    fn list(&self, kind: AssetKind) -> Result<Vec<PathBuf>, AssetError>;
}

/// Lists assets from `<root>/<kind subdir>`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.subdir())
    }
}

impl AssetLoader for DirectoryLoader {
    fn list(&self, kind: AssetKind) -> Result<Vec<PathBuf>, AssetError> {
        let dir = self.dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("asset directory {} does not exist", dir.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(AssetError::Io { path: dir, source }),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| AssetError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && kind.matches(&path) {
                files.push(path);
            }
        }
        files.sort();
        debug!("found {} {:?} assets in {}", files.len(), kind, dir.display());
        Ok(files)
    }
}

/// Chooses a file of a given kind. `None` means the user cancelled.
pub trait FilePicker {
    fn pick(&mut self, kind: AssetKind) -> Option<PathBuf>;
}

/// Steps through the loader's listing, one file per request, wrapping
/// around at the end.
pub struct CyclingPicker {
    loader: Rc<dyn AssetLoader>,
    next: HashMap<AssetKind, usize>,
}

impl CyclingPicker {
    pub fn new(loader: Rc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            next: HashMap::new(),
        }
    }
}

impl FilePicker for CyclingPicker {
    fn pick(&mut self, kind: AssetKind) -> Option<PathBuf> {
        let files = match self.loader.list(kind) {
            Ok(files) => files,
            Err(e) => {
                warn!("could not list {kind:?} assets: {e}");
                return None;
            }
        };
        if files.is_empty() {
            return None;
        }
        let index = self.next.entry(kind).or_insert(0);
        let path = files[*index % files.len()].clone();
        *index = (*index + 1) % files.len();
        Some(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded images as premultiplied RGBA pixmaps, ready for the rasterizer.
#[derive(Default)]
pub struct ImageStore {
    images: HashMap<ImageId, Pixmap>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `path`, optionally resizing it to `scale`.
    pub fn load(&mut self, path: &Path, scale: Option<Size>) -> Result<ImageId, AssetError> {
        let decoded = image::open(path).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = match scale {
            Some(size) if size.width >= 1.0 && size.height >= 1.0 => decoded.resize_exact(
                size.width as u32,
                size.height as u32,
                image::imageops::FilterType::Triangle,
            ),
            _ => decoded,
        };
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let id = self.insert_rgba(width, height, rgba.into_raw())?;
        info!("loaded image {} ({width}x{height})", path.display());
        Ok(id)
    }

    /// Stores straight (non-premultiplied) RGBA8 pixels.
    pub fn insert_rgba(&mut self, width: u32, height: u32, mut data: Vec<u8>) -> Result<ImageId, AssetError> {
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
        let size = IntSize::from_wh(width, height).ok_or(AssetError::InvalidImage { width, height })?;
        let pixmap = Pixmap::from_vec(data, size).ok_or(AssetError::InvalidImage { width, height })?;
        let id = ImageId::new();
        self.images.insert(id, pixmap);
        Ok(id)
    }

    pub fn get(&self, id: ImageId) -> Option<&Pixmap> {
        self.images.get(&id)
    }

    pub fn size(&self, id: ImageId) -> Option<Size> {
        self.images
            .get(&id)
            .map(|p| Size::new(p.width() as f32, p.height() as f32))
    }

    pub fn remove(&mut self, id: ImageId) -> bool {
        self.images.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
