//! Scene manager
//!
//! Owns the scene graph, the texture cache, and the storage collaborator, and
//! drives the four pillars of the viewer: building scenes, rendering them
//! with distance culling, persisting them transactionally, and fanning out
//! change notifications.

use crate::assets::ResourceManager;
use crate::foundation::math::{Transform, Vec3};
use crate::foundation::time::{Stopwatch, Timer};
use crate::input::{command_for_key, SceneCommand};
use crate::scene::graph::{NodeKey, SceneGraph, SceneNode};
use crate::scene::object::{create_object, CuttingBoard, FruitBowl, SaltShaker, SceneObject, Teapot};
use crate::scene::observer::{ObserverList, SceneObserver};
use crate::scene::SceneError;
use crate::storage::database::Row;
use crate::storage::DatabaseManager;
use std::str::FromStr;
use std::sync::Arc;

/// Nodes farther than this from the camera are culled from rendering
pub const CULL_DISTANCE: f32 = 10.0;

/// Scene name used by the save and load key commands
pub const DEFAULT_SCENE_NAME: &str = "default";

/// Type tag persisted for nodes that carry no object
const EMPTY_TYPE_TAG: &str = "empty";

/// `parent_id` value marking persisted root nodes
const ROOT_SENTINEL: i64 = -1;

/// Central coordinator for scene state
///
/// All mutating operations notify registered observers after the change has
/// been applied. Rendering never mutates the graph.
pub struct SceneManager {
    graph: SceneGraph,
    resources: ResourceManager,
    db: DatabaseManager,
    camera_position: Vec3,
    camera_rotation: Vec3,
    timer: Timer,
    last_render_time_ms: f32,
    visible_object_count: usize,
    observers: ObserverList,
}

impl SceneManager {
    /// Create a scene manager over a storage collaborator and texture cache
    ///
    /// If the database is connected, the persistence schema is created when
    /// missing. A disconnected database is accepted; save and load will fail
    /// until a connection is opened.
    pub fn new(db: DatabaseManager, resources: ResourceManager) -> Result<Self, SceneError> {
        let manager = Self {
            graph: SceneGraph::new(),
            resources,
            db,
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            camera_rotation: Vec3::zeros(),
            timer: Timer::new(),
            last_render_time_ms: 0.0,
            visible_object_count: 0,
            observers: ObserverList::new(),
        };
        if manager.db.is_connected() {
            manager.initialize_schema()?;
        }
        Ok(manager)
    }

    fn initialize_schema(&self) -> Result<(), SceneError> {
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS scenes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );",
            &[],
        )?;
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS scene_objects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                scene_id INTEGER NOT NULL,
                parent_id INTEGER,
                type TEXT NOT NULL,
                name TEXT NOT NULL,
                pos_x REAL NOT NULL,
                pos_y REAL NOT NULL,
                pos_z REAL NOT NULL,
                rot_x REAL NOT NULL,
                rot_y REAL NOT NULL,
                rot_z REAL NOT NULL,
                scale_x REAL NOT NULL,
                scale_y REAL NOT NULL,
                scale_z REAL NOT NULL,
                texture_name TEXT,
                FOREIGN KEY (scene_id) REFERENCES scenes(id)
            );",
            &[],
        )?;
        log::debug!("persistence schema ready");
        Ok(())
    }

    // -- Scene construction ---------------------------------------------

    /// Build the default kitchen scene
    ///
    /// A cutting board at the origin carrying a teapot, plus a fruit bowl and
    /// a salt shaker as independent roots. Replaces any current content.
    pub fn create_default_scene(&mut self) -> Result<(), SceneError> {
        self.graph.clear();

        let board: Arc<dyn SceneObject> =
            Arc::new(CuttingBoard::new("Cutting Board", Some("wood".to_string())));
        let board_key = self.graph.add_root(Some(board), Transform::identity());

        let teapot: Arc<dyn SceneObject> =
            Arc::new(Teapot::new("Teapot", Some("metal".to_string())));
        self.graph.add_child(
            board_key,
            Some(teapot),
            Transform::from_position(Vec3::new(0.5, 0.5, 0.0)),
        )?;

        let bowl: Arc<dyn SceneObject> = Arc::new(FruitBowl::new("Fruit Bowl", None));
        self.graph
            .add_root(Some(bowl), Transform::from_position(Vec3::new(-0.5, 0.3, 0.0)));

        let shaker: Arc<dyn SceneObject> = Arc::new(SaltShaker::new("Salt Shaker", None));
        self.graph
            .add_root(Some(shaker), Transform::from_position(Vec3::new(0.0, 0.2, 0.5)));

        log::info!("default scene created ({} nodes)", self.graph.node_count());
        self.observers.notify();
        Ok(())
    }

    /// Append a new root node and notify observers
    pub fn add_root(&mut self, object: Option<Arc<dyn SceneObject>>, local: Transform) -> NodeKey {
        let key = self.graph.add_root(object, local);
        self.observers.notify();
        key
    }

    /// Attach a new child node and notify observers
    pub fn add_child(
        &mut self,
        parent: NodeKey,
        object: Option<Arc<dyn SceneObject>>,
        local: Transform,
    ) -> Result<NodeKey, SceneError> {
        let key = self.graph.add_child(parent, object, local)?;
        self.observers.notify();
        Ok(key)
    }

    /// Remove a node and its subtree, then notify observers
    pub fn remove_node(&mut self, key: NodeKey) -> Result<(), SceneError> {
        self.graph.remove_node(key)?;
        self.observers.notify();
        Ok(())
    }

    /// Replace a node's local transform and notify observers
    pub fn set_local_transform(
        &mut self,
        key: NodeKey,
        local: Transform,
    ) -> Result<(), SceneError> {
        self.graph.set_local_transform(key, local)?;
        self.observers.notify();
        Ok(())
    }

    // -- Observers ------------------------------------------------------

    /// Register a scene change observer
    pub fn add_observer(&mut self, observer: Arc<dyn SceneObserver>) {
        self.observers.add(observer);
    }

    /// Remove the first registration of an observer
    pub fn remove_observer(&mut self, observer: &Arc<dyn SceneObserver>) -> bool {
        self.observers.remove(observer)
    }

    // -- Rendering ------------------------------------------------------

    /// Render one frame
    ///
    /// Walks the graph in preorder, culls nodes farther than [`CULL_DISTANCE`]
    /// from the camera, and emits a draw call for every surviving object.
    /// Culling is per node: a culled parent's children are still considered
    /// on their own world positions. Updates the frame timer and the render
    /// metrics.
    pub fn render_scene(&mut self) {
        let watch = Stopwatch::start_new();
        let camera = self.camera_position;
        let resources = &self.resources;

        let mut visible = 0;
        self.graph.visit_preorder(|_, node| {
            if !Self::is_visible_at(node, camera) {
                return;
            }
            if let Some(object) = node.object() {
                if let Some(texture_name) = object.texture() {
                    // Logs a warning on a cache miss; the draw proceeds untextured.
                    let _ = resources.get_texture(texture_name);
                }
                object.render(node.world_transform());
                visible += 1;
            }
        });

        self.visible_object_count = visible;
        self.last_render_time_ms = watch.elapsed_millis();
        self.timer.update();
        log::debug!(
            "frame {}: {} visible objects, {:.3} ms, {:.1} fps",
            self.timer.frame_count(),
            self.visible_object_count,
            self.last_render_time_ms,
            self.timer.current_fps(),
        );
    }

    /// Per-frame update pass over every object in the scene
    pub fn update_scene(&self, delta_time: f32) {
        self.graph.visit_preorder(|_, node| {
            if let Some(object) = node.object() {
                object.update(delta_time);
            }
        });
    }

    /// Whether the node at `key` would be rendered this frame
    ///
    /// Nodes without an object payload are never visible.
    pub fn is_in_frustum(&self, key: NodeKey) -> bool {
        self.graph
            .node(key)
            .map_or(false, |node| Self::is_visible_at(node, self.camera_position))
    }

    fn is_visible_at(node: &SceneNode, camera: Vec3) -> bool {
        if node.object().is_none() {
            return false;
        }
        let distance = (node.world_transform().position - camera).magnitude();
        distance <= CULL_DISTANCE
    }

    // -- Input ----------------------------------------------------------

    /// Apply a scene command
    pub fn apply_command(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        match command {
            SceneCommand::MoveCamera(delta) => {
                self.camera_position += delta;
                Ok(())
            }
            SceneCommand::RotateCamera { pitch, yaw } => {
                self.camera_rotation.x += pitch;
                self.camera_rotation.y += yaw;
                Ok(())
            }
            SceneCommand::SaveScene => self.save_scene(DEFAULT_SCENE_NAME),
            SceneCommand::LoadScene => self.load_scene(DEFAULT_SCENE_NAME),
        }
    }

    /// Dispatch a key press
    ///
    /// Returns whether the key was bound to a command.
    pub fn handle_key(&mut self, key: char) -> Result<bool, SceneError> {
        match command_for_key(key) {
            Some(command) => {
                self.apply_command(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // -- Persistence ----------------------------------------------------

    /// Persist the current scene under `name`, replacing any prior save
    ///
    /// The whole save runs inside one transaction: on any failure the
    /// database is rolled back to its prior state and the error is returned.
    pub fn save_scene(&self, name: &str) -> Result<(), SceneError> {
        self.db.execute("BEGIN TRANSACTION;", &[])?;
        let committed = self.save_scene_rows(name).and_then(|()| {
            self.db.execute("COMMIT;", &[])?;
            Ok(())
        });
        match committed {
            Ok(()) => {
                log::info!("scene '{name}' saved ({} nodes)", self.graph.node_count());
                Ok(())
            }
            Err(error) => {
                if let Err(rollback) = self.db.execute("ROLLBACK;", &[]) {
                    log::error!("rollback failed after save error: {rollback}");
                }
                Err(error)
            }
        }
    }

    fn save_scene_rows(&self, name: &str) -> Result<(), SceneError> {
        self.db.execute(
            "DELETE FROM scene_objects WHERE scene_id IN (SELECT id FROM scenes WHERE name = ?1);",
            &[name],
        )?;
        self.db.execute("DELETE FROM scenes WHERE name = ?1;", &[name])?;
        let scene_id = self
            .db
            .execute_insert("INSERT INTO scenes (name) VALUES (?1);", &[name])?;
        for &root in self.graph.roots() {
            self.save_node_recursive(root, scene_id, ROOT_SENTINEL)?;
        }
        Ok(())
    }

    fn save_node_recursive(
        &self,
        key: NodeKey,
        scene_id: i64,
        parent_id: i64,
    ) -> Result<(), SceneError> {
        let node = self
            .graph
            .node(key)
            .ok_or_else(|| SceneError::InvalidOperation("node no longer exists".to_string()))?;

        let (type_tag, name, texture) = node.object().map_or_else(
            || (EMPTY_TYPE_TAG.to_string(), String::new(), String::new()),
            |object| {
                (
                    object.kind().as_str().to_string(),
                    object.name().to_string(),
                    object.texture().unwrap_or("").to_string(),
                )
            },
        );

        let local = node.local_transform();
        let scene_id_text = scene_id.to_string();
        let parent_id_text = parent_id.to_string();
        let pos = [
            local.position.x.to_string(),
            local.position.y.to_string(),
            local.position.z.to_string(),
        ];
        let rot = [
            local.rotation.x.to_string(),
            local.rotation.y.to_string(),
            local.rotation.z.to_string(),
        ];
        let scale = [
            local.scale.x.to_string(),
            local.scale.y.to_string(),
            local.scale.z.to_string(),
        ];

        let params: Vec<&str> = vec![
            &scene_id_text,
            &parent_id_text,
            &type_tag,
            &name,
            &pos[0],
            &pos[1],
            &pos[2],
            &rot[0],
            &rot[1],
            &rot[2],
            &scale[0],
            &scale[1],
            &scale[2],
            &texture,
        ];
        let node_id = self.db.execute_insert(
            "INSERT INTO scene_objects (
                scene_id, parent_id, type, name,
                pos_x, pos_y, pos_z,
                rot_x, rot_y, rot_z,
                scale_x, scale_y, scale_z,
                texture_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            &params,
        )?;

        for &child in node.children() {
            self.save_node_recursive(child, scene_id, node_id)?;
        }
        Ok(())
    }

    /// Replace the current scene with the one persisted under `name`
    ///
    /// The current graph is cleared before the database is read, so a failed
    /// load leaves an empty scene rather than a partial one.
    pub fn load_scene(&mut self, name: &str) -> Result<(), SceneError> {
        self.graph.clear();

        let scenes = self
            .db
            .execute_query("SELECT id FROM scenes WHERE name = ?1;", &[name])?;
        let Some(scene_row) = scenes.first() else {
            return Err(SceneError::NotFound(name.to_string()));
        };
        let scene_id = field(scene_row, "id")?.to_string();
        let sentinel = ROOT_SENTINEL.to_string();

        let roots = self.db.execute_query(
            "SELECT * FROM scene_objects
             WHERE scene_id = ?1 AND (parent_id IS NULL OR parent_id = ?2)
             ORDER BY id;",
            &[&scene_id, &sentinel],
        )?;
        for row in &roots {
            let (object, local) = node_from_row(row)?;
            let key = self.graph.add_root(object, local);
            self.load_children_recursive(&scene_id, field(row, "id")?.to_string(), key)?;
        }

        log::info!("scene '{name}' loaded ({} nodes)", self.graph.node_count());
        self.observers.notify();
        Ok(())
    }

    fn load_children_recursive(
        &mut self,
        scene_id: &str,
        parent_row_id: String,
        parent_key: NodeKey,
    ) -> Result<(), SceneError> {
        let children = self.db.execute_query(
            "SELECT * FROM scene_objects WHERE scene_id = ?1 AND parent_id = ?2 ORDER BY id;",
            &[scene_id, &parent_row_id],
        )?;
        for row in &children {
            let (object, local) = node_from_row(row)?;
            let key = self.graph.add_child(parent_key, object, local)?;
            self.load_children_recursive(scene_id, field(row, "id")?.to_string(), key)?;
        }
        Ok(())
    }

    // -- Accessors ------------------------------------------------------

    /// Current camera position
    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Current camera rotation in Euler degrees
    pub fn camera_rotation(&self) -> Vec3 {
        self.camera_rotation
    }

    /// Move the camera to an absolute position
    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera_position = position;
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The scene graph, mutably
    ///
    /// Direct mutation bypasses observer notification; prefer the manager's
    /// wrappers when listeners must stay informed.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The texture cache
    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// The texture cache, mutably
    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        &mut self.resources
    }

    /// Wall-clock duration of the last render pass, in milliseconds
    pub fn last_render_time_ms(&self) -> f32 {
        self.last_render_time_ms
    }

    /// Instantaneous frames per second from the frame timer
    pub fn current_fps(&self) -> f32 {
        self.timer.current_fps()
    }

    /// Number of objects that survived culling in the last render pass
    pub fn visible_object_count(&self) -> usize {
        self.visible_object_count
    }
}

/// Fetch a required column from a result row
fn field<'a>(row: &'a Row, name: &'static str) -> Result<&'a str, SceneError> {
    row.get(name)
        .map(String::as_str)
        .ok_or(SceneError::MalformedRecord {
            field: name,
            value: String::new(),
        })
}

/// Parse a required column into a typed value
fn parse_field<T: FromStr>(row: &Row, name: &'static str) -> Result<T, SceneError> {
    let raw = field(row, name)?;
    raw.parse().map_err(|_| SceneError::MalformedRecord {
        field: name,
        value: raw.to_string(),
    })
}

/// Reconstruct a node's payload and local transform from a persisted row
///
/// Unknown type tags (including the empty-node tag) reconstruct as pure
/// grouping nodes. An empty texture column means no texture.
fn node_from_row(row: &Row) -> Result<(Option<Arc<dyn SceneObject>>, Transform), SceneError> {
    let type_tag = field(row, "type")?;
    let name = field(row, "name")?;
    let texture = match field(row, "texture_name")? {
        "" => None,
        texture => Some(texture),
    };
    let object = create_object(type_tag, name, texture);

    let local = Transform::new(
        Vec3::new(
            parse_field(row, "pos_x")?,
            parse_field(row, "pos_y")?,
            parse_field(row, "pos_z")?,
        ),
        Vec3::new(
            parse_field(row, "rot_x")?,
            parse_field(row, "rot_y")?,
            parse_field(row, "rot_z")?,
        ),
        Vec3::new(
            parse_field(row, "scale_x")?,
            parse_field(row, "scale_y")?,
            parse_field(row, "scale_z")?,
        ),
    );
    Ok((object, local))
}
