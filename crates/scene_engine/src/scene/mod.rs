//! Scene graph, objects, observers, and the scene manager

pub mod graph;
pub mod object;
pub mod observer;
pub mod scene_manager;

pub use graph::{NodeKey, SceneGraph, SceneNode};
pub use object::{create_object, CuttingBoard, FruitBowl, ObjectKind, SaltShaker, SceneObject, Teapot};
pub use observer::{ObserverList, SceneObserver};
pub use scene_manager::{SceneManager, CULL_DISTANCE, DEFAULT_SCENE_NAME};

use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by scene graph mutation and persistence
///
/// Nothing here is fatal to the process; every failure is recoverable at
/// the caller.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No persisted scene exists under the requested name
    #[error("scene not found: {0}")]
    NotFound(String),

    /// The storage collaborator failed
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    /// A structural tree operation was misused
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A child index was outside the current child range
    #[error("child index {index} out of range (child count {count})")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The child count at the time of the call
        count: usize,
    },

    /// A persisted field could not be parsed during load
    #[error("malformed record: field '{field}' has value '{value}'")]
    MalformedRecord {
        /// Column name of the offending field
        field: &'static str,
        /// The raw stored value
        value: String,
    },
}
