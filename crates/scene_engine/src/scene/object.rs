//! Renderable scene objects
//!
//! The closed object set of the kitchen scene. Each object exposes a stable
//! type tag used by persistence, a display name, and the name of the texture
//! it binds. Render behavior here emits a draw record through the logger;
//! actual rasterization lives outside this crate.
//!
//! Objects carry no position of their own: the owning node's local transform
//! is the single authority for placement.

use crate::foundation::math::Transform;
use std::fmt;
use std::sync::Arc;

/// Stable type tags for the closed object set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Flat wooden board other objects can sit on
    CuttingBoard,
    /// The teapot
    Teapot,
    /// Bowl of fruit
    FruitBowl,
    /// Salt shaker
    SaltShaker,
}

impl ObjectKind {
    /// Stable tag written to the `type` column of persisted node rows
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CuttingBoard => "CuttingBoard",
            Self::Teapot => "Teapot",
            Self::FruitBowl => "FruitBowl",
            Self::SaltShaker => "SaltShaker",
        }
    }

    /// Parse a persisted type tag
    ///
    /// Unknown tags return `None`; loaders treat those rows as pure grouping
    /// nodes rather than errors.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "CuttingBoard" => Some(Self::CuttingBoard),
            "Teapot" => Some(Self::Teapot),
            "FruitBowl" => Some(Self::FruitBowl),
            "SaltShaker" => Some(Self::SaltShaker),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A renderable payload attached to a scene node
///
/// Held behind `Arc` so in-flight lookups can observe the object while the
/// owning node keeps the only structural reference. The type tag is fixed at
/// construction and determines render behavior and persistence dispatch.
pub trait SceneObject: Send + Sync {
    /// The stable type tag
    fn kind(&self) -> ObjectKind;

    /// Display name
    fn name(&self) -> &str;

    /// Name of the texture to bind at draw time, if any
    fn texture(&self) -> Option<&str>;

    /// Emit this object's draw call at the given world transform
    fn render(&self, world: &Transform);

    /// Per-frame update hook
    fn update(&self, delta_time: f32) {
        let _ = delta_time;
    }
}

/// Flat wooden board other objects can sit on
pub struct CuttingBoard {
    name: String,
    texture: Option<String>,
}

impl CuttingBoard {
    /// Create a cutting board
    pub fn new(name: impl Into<String>, texture: Option<String>) -> Self {
        Self {
            name: name.into(),
            texture,
        }
    }
}

impl SceneObject for CuttingBoard {
    fn kind(&self) -> ObjectKind {
        ObjectKind::CuttingBoard
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    fn render(&self, world: &Transform) {
        log::debug!(
            target: "draw",
            "cutting board '{}': slab at ({:.2}, {:.2}, {:.2}) scale ({:.2}, {:.2}, {:.2})",
            self.name,
            world.position.x,
            world.position.y,
            world.position.z,
            world.scale.x,
            world.scale.y,
            world.scale.z,
        );
    }
}

/// The teapot
pub struct Teapot {
    name: String,
    texture: Option<String>,
}

impl Teapot {
    /// Create a teapot
    pub fn new(name: impl Into<String>, texture: Option<String>) -> Self {
        Self {
            name: name.into(),
            texture,
        }
    }
}

impl SceneObject for Teapot {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Teapot
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    fn render(&self, world: &Transform) {
        log::debug!(
            target: "draw",
            "teapot '{}': body, spout, and handle at ({:.2}, {:.2}, {:.2}) yaw {:.1}°",
            self.name,
            world.position.x,
            world.position.y,
            world.position.z,
            world.rotation.y,
        );
    }
}

/// Bowl of fruit
pub struct FruitBowl {
    name: String,
    texture: Option<String>,
}

impl FruitBowl {
    /// Create a fruit bowl
    pub fn new(name: impl Into<String>, texture: Option<String>) -> Self {
        Self {
            name: name.into(),
            texture,
        }
    }
}

impl SceneObject for FruitBowl {
    fn kind(&self) -> ObjectKind {
        ObjectKind::FruitBowl
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    fn render(&self, world: &Transform) {
        log::debug!(
            target: "draw",
            "fruit bowl '{}': bowl and fruit at ({:.2}, {:.2}, {:.2})",
            self.name,
            world.position.x,
            world.position.y,
            world.position.z,
        );
    }
}

/// Salt shaker
pub struct SaltShaker {
    name: String,
    texture: Option<String>,
}

impl SaltShaker {
    /// Create a salt shaker
    pub fn new(name: impl Into<String>, texture: Option<String>) -> Self {
        Self {
            name: name.into(),
            texture,
        }
    }
}

impl SceneObject for SaltShaker {
    fn kind(&self) -> ObjectKind {
        ObjectKind::SaltShaker
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    fn render(&self, world: &Transform) {
        log::debug!(
            target: "draw",
            "salt shaker '{}': cylinder and cap at ({:.2}, {:.2}, {:.2})",
            self.name,
            world.position.x,
            world.position.y,
            world.position.z,
        );
    }
}

/// Instantiate an object from a persisted row's type tag, name, and texture
///
/// Unknown tags yield `None`: the corresponding node loads as a pure
/// grouping node, not an error.
pub fn create_object(tag: &str, name: &str, texture: Option<&str>) -> Option<Arc<dyn SceneObject>> {
    let kind = ObjectKind::from_tag(tag)?;
    let texture = texture.map(str::to_owned);
    let object: Arc<dyn SceneObject> = match kind {
        ObjectKind::CuttingBoard => Arc::new(CuttingBoard::new(name, texture)),
        ObjectKind::Teapot => Arc::new(Teapot::new(name, texture)),
        ObjectKind::FruitBowl => Arc::new(FruitBowl::new(name, texture)),
        ObjectKind::SaltShaker => Arc::new(SaltShaker::new(name, texture)),
    };
    Some(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in [
            ObjectKind::CuttingBoard,
            ObjectKind::Teapot,
            ObjectKind::FruitBowl,
            ObjectKind::SaltShaker,
        ] {
            assert_eq!(ObjectKind::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_tag_yields_no_object() {
        assert_eq!(ObjectKind::from_tag("Spatula"), None);
        assert!(create_object("Spatula", "spatula", None).is_none());
        assert!(create_object("empty", "", None).is_none());
    }

    #[test]
    fn test_factory_preserves_name_and_texture() {
        let object = create_object("Teapot", "Teapot", Some("metal")).expect("known tag");
        assert_eq!(object.kind(), ObjectKind::Teapot);
        assert_eq!(object.name(), "Teapot");
        assert_eq!(object.texture(), Some("metal"));
    }
}
