//! Resource Manager - CPU-side texture cache
//!
//! Caches decoded textures by name and hands out opaque handles that
//! renderers resolve at draw time. GPU upload and resource lifetime are
//! outside this crate. The cache assumes single-threaded callers and
//! performs no locking.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Texture cache errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Texture file could not be read
    #[error("failed to read texture file: {0}")]
    Io(#[from] std::io::Error),

    /// File contents could not be decoded as an image
    #[error("failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),
}

/// Opaque handle to a cached texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

/// A decoded texture
pub struct Texture {
    /// Pixel width
    pub width: u32,

    /// Pixel height
    pub height: u32,

    /// RGBA8 pixel data
    pub pixels: image::RgbaImage,
}

/// Name-keyed texture cache
pub struct ResourceManager {
    handles: HashMap<String, TextureHandle>,
    textures: HashMap<TextureHandle, Texture>,
    next_handle: u32,
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            textures: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Load a texture from disk, or return the cached handle if `name` is
    /// already loaded (the decode is skipped entirely on a cache hit)
    pub fn load_texture(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, ResourceError> {
        if let Some(&handle) = self.handles.get(name) {
            log::debug!("using cached texture: {name}");
            return Ok(handle);
        }

        let bytes = std::fs::read(path.as_ref())?;
        let pixels = image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = pixels.dimensions();
        let handle = self.insert(
            name,
            Texture {
                width,
                height,
                pixels,
            },
        );
        log::info!("loaded texture '{name}' ({width}x{height})");
        Ok(handle)
    }

    /// Register a procedurally generated 256×256 placeholder under `name`
    ///
    /// Idempotent like [`load_texture`](Self::load_texture). Lets the viewer
    /// run without texture files on disk.
    pub fn load_placeholder(&mut self, name: &str) -> TextureHandle {
        if let Some(&handle) = self.handles.get(name) {
            return handle;
        }

        let mut pixels = image::RgbaImage::new(256, 256);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            *pixel = image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + 128) % 256) as u8, 255]);
        }
        let handle = self.insert(
            name,
            Texture {
                width: 256,
                height: 256,
                pixels,
            },
        );
        log::info!("registered placeholder texture '{name}'");
        handle
    }

    /// Look up a texture handle by name
    pub fn get_texture(&self, name: &str) -> Option<TextureHandle> {
        let handle = self.handles.get(name).copied();
        if handle.is_none() {
            log::warn!("texture not found: {name}");
        }
        handle
    }

    /// Resolve a handle to the decoded texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(&handle)
    }

    /// Drop a texture from the cache
    ///
    /// Returns whether a texture was removed. Handles to an unloaded texture
    /// stop resolving.
    pub fn unload_texture(&mut self, name: &str) -> bool {
        match self.handles.remove(name) {
            Some(handle) => {
                self.textures.remove(&handle);
                log::info!("unloaded texture: {name}");
                true
            }
            None => false,
        }
    }

    /// Number of cached textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn insert(&mut self, name: &str, texture: Texture) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(name.to_string(), handle);
        self.textures.insert(handle, texture);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_idempotent() {
        let mut rm = ResourceManager::new();
        let first = rm.load_placeholder("wood");
        let second = rm.load_placeholder("wood");
        assert_eq!(first, second);
        assert_eq!(rm.texture_count(), 1);
    }

    #[test]
    fn test_get_texture_resolves_by_name() {
        let mut rm = ResourceManager::new();
        let handle = rm.load_placeholder("metal");
        assert_eq!(rm.get_texture("metal"), Some(handle));
        assert_eq!(rm.get_texture("missing"), None);

        let texture = rm.texture(handle).expect("handle resolves");
        assert_eq!((texture.width, texture.height), (256, 256));
    }

    #[test]
    fn test_unload_texture() {
        let mut rm = ResourceManager::new();
        let handle = rm.load_placeholder("wood");
        assert!(rm.unload_texture("wood"));
        assert!(!rm.unload_texture("wood"));
        assert_eq!(rm.texture_count(), 0);
        assert!(rm.texture(handle).is_none());
    }

    #[test]
    fn test_load_texture_missing_file_is_io_error() {
        let mut rm = ResourceManager::new();
        let result = rm.load_texture("wood", "does/not/exist.png");
        assert!(matches!(result, Err(ResourceError::Io(_))));
    }
}
