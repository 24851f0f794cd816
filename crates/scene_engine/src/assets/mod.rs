//! Asset layer - CPU-side resource caching

pub mod resource_manager;

pub use resource_manager::{ResourceError, ResourceManager, Texture, TextureHandle};
