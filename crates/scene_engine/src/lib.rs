//! # Scene Engine
//!
//! A hierarchical scene representation for a small interactive 3D viewer:
//! a forest of nodes carrying optional renderable objects, composed
//! parent-to-child into world-space transforms, with a transactional
//! save/load round-trip against a SQLite store.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed ownership tree with cached world
//!   transforms that are never stale after a mutating call returns
//! - **Render Pass**: Preorder traversal with distance-based culling and
//!   live render-time/FPS/visible-object metrics
//! - **Persistence**: Whole-forest save/load that reconstructs exact
//!   parent/child structure and per-node local transforms
//! - **Observers**: Synchronous change notification after structural edits
//! - **Resource Cache**: Name-keyed CPU-side texture cache
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut db = DatabaseManager::new();
//!     db.connect("kitchen_scene.db")?;
//!
//!     let mut manager = SceneManager::new(db, ResourceManager::new())?;
//!     manager.create_default_scene()?;
//!     manager.render_scene();
//!     manager.save_scene("default")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod scene;
pub mod storage;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{ResourceManager, TextureHandle},
        config::{Config, ViewerConfig},
        foundation::{
            math::{Transform, Vec3},
            time::{Stopwatch, Timer},
        },
        input::{command_for_key, SceneCommand},
        scene::{
            create_object, NodeKey, ObjectKind, SceneError, SceneGraph, SceneManager,
            SceneObject, SceneObserver,
        },
        storage::{DatabaseManager, StorageError},
    };
}
