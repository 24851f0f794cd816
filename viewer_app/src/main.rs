//! Kitchen scene viewer
//!
//! Builds the default kitchen scene, runs a short scripted interaction
//! session through the key dispatcher, and exercises the save/load round
//! trip against the configured SQLite database. The windowing layer is out
//! of scope here; the scripted key sequence stands in for real input events.

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const CONFIG_PATH: &str = "viewer.toml";

/// Logs every scene change and keeps a running count
struct ChangeLogger {
    changes: AtomicUsize,
}

impl ChangeLogger {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            changes: AtomicUsize::new(0),
        })
    }
}

impl SceneObserver for ChangeLogger {
    fn on_scene_changed(&self) {
        let count = self.changes.fetch_add(1, Ordering::Relaxed) + 1;
        log::info!("scene changed (change #{count})");
    }
}

fn run() -> Result<(), SceneError> {
    let config = ViewerConfig::load_from_file(CONFIG_PATH).unwrap_or_else(|error| {
        log::warn!("no usable config at {CONFIG_PATH} ({error}); using defaults");
        ViewerConfig::default()
    });

    let mut db = DatabaseManager::new();
    db.connect(&config.database_path)?;

    let mut resources = ResourceManager::new();
    for entry in &config.textures {
        if let Err(error) = resources.load_texture(&entry.name, &entry.file) {
            log::warn!(
                "texture '{}' unavailable ({error}); using placeholder",
                entry.name
            );
            resources.load_placeholder(&entry.name);
        }
    }

    let mut manager = SceneManager::new(db, resources)?;
    manager.set_camera_position(Vec3::new(
        config.camera_position[0],
        config.camera_position[1],
        config.camera_position[2],
    ));

    let logger = ChangeLogger::new();
    manager.add_observer(logger.clone());

    manager.create_default_scene()?;
    manager.render_scene();
    log::info!(
        "initial frame: {} visible objects in {:.3} ms",
        manager.visible_object_count(),
        manager.last_render_time_ms(),
    );

    // Scripted session: move around, save, then reload what was saved.
    let session = ['w', 'w', 'a', 'q', 'e', 'd', 's', '1', '2'];
    for key in session {
        if !manager.handle_key(key)? {
            log::warn!("unbound key: {key}");
            continue;
        }
        manager.update_scene(1.0 / 60.0);
        manager.render_scene();
    }

    log::info!(
        "session done: camera at ({:.2}, {:.2}, {:.2}), {} visible objects, {} scene changes",
        manager.camera_position().x,
        manager.camera_position().y,
        manager.camera_position().z,
        manager.visible_object_count(),
        logger.changes.load(Ordering::Relaxed),
    );
    Ok(())
}

fn main() {
    logging::init();

    if let Err(error) = run() {
        log::error!("viewer failed: {error}");
        std::process::exit(1);
    }
}
