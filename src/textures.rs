//! Texture resource cache
//!
//! Texture parameters only store a path. At render time the effect resolves
//! the path here: the image is decoded once with the `image` crate, uploaded
//! through the device and shared by every parameter naming the same file.
//! Paths that fail to load are remembered and not retried until [`clear`].
//!
//! [`clear`]: TextureCache::clear

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::gpu::{DeviceError, ImageData, ShaderDevice, TextureId};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// An uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

pub struct TextureCache {
    device: Rc<dyn ShaderDevice>,
    /// Directory relative paths are resolved against
    base_dir: RefCell<Option<PathBuf>>,
    entries: RefCell<HashMap<PathBuf, Option<TextureHandle>>>,
}

impl TextureCache {
    pub fn new(device: Rc<dyn ShaderDevice>) -> Self {
        Self {
            device,
            base_dir: RefCell::new(None),
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve relative paths against `dir` (usually the effect file's directory)
    pub fn set_base_dir(&self, dir: Option<PathBuf>) {
        *self.base_dir.borrow_mut() = dir;
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match self.base_dir.borrow().as_ref() {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Texture for `path`, loading it on first use
    ///
    /// Returns `None` for an empty path or an image that cannot be loaded.
    pub fn open(&self, path: &str) -> Option<TextureHandle> {
        if path.is_empty() {
            return None;
        }
        let resolved = self.resolve(path);
        if let Some(entry) = self.entries.borrow().get(&resolved) {
            return *entry;
        }

        let entry = match self.load(&resolved) {
            Ok(handle) => {
                log::info!(
                    "Loaded texture {} ({}x{})",
                    resolved.display(),
                    handle.width,
                    handle.height
                );
                Some(handle)
            }
            Err(e) => {
                log::warn!("Failed to load texture {}: {}", resolved.display(), e);
                None
            }
        };
        self.entries.borrow_mut().insert(resolved, entry);
        entry
    }

    fn load(&self, path: &Path) -> Result<TextureHandle, TextureError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = ImageData {
            width,
            height,
            pixels: rgba.into_raw(),
        };
        let id = self.device.create_texture_2d(&data)?;
        Ok(TextureHandle { id, width, height })
    }

    /// Number of cached paths, failed ones included
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Release every texture and forget failed paths
    pub fn clear(&self) {
        for handle in self.entries.borrow_mut().drain().filter_map(|(_, entry)| entry) {
            self.device.delete_texture(handle.id);
        }
    }
}

impl Drop for TextureCache {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::fake::FakeDevice;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shader-workbench-textures-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_open_shares_handles() {
        let dir = temp_dir("shared");
        image::RgbaImage::new(4, 2).save(dir.join("checker.png")).unwrap();

        let device = Rc::new(FakeDevice::new());
        let cache = TextureCache::new(device.clone());
        cache.set_base_dir(Some(dir.clone()));

        let first = cache.open("checker.png").unwrap();
        let second = cache.open("checker.png").unwrap();
        assert_eq!(first, second);
        assert_eq!((first.width, first.height), (4, 2));
        assert_eq!(device.live_textures(), 1);

        drop(cache);
        assert_eq!(device.live_textures(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_is_remembered() {
        let device = Rc::new(FakeDevice::new());
        let cache = TextureCache::new(device.clone());
        assert!(cache.open("does/not/exist.png").is_none());
        assert!(cache.open("does/not/exist.png").is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.open("").is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
