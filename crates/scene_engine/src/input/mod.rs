//! Keyboard command dispatch
//!
//! Thin mapping from viewer key presses to scene commands. The windowing
//! layer that produces key events lives outside this crate; it feeds
//! characters to [`command_for_key`] and hands the result to the scene
//! manager.

use crate::foundation::math::Vec3;

/// Camera translation per move key press, in world units
pub const CAMERA_STEP: f32 = 0.1;

/// View rotation per rotate key press, in degrees
pub const ROTATE_STEP: f32 = 5.0;

/// Commands produced by the key dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Translate the camera by a world-space delta
    MoveCamera(Vec3),

    /// Rotate the camera view
    RotateCamera {
        /// Rotation about the X axis, degrees
        pitch: f32,
        /// Rotation about the Y axis, degrees
        yaw: f32,
    },

    /// Persist the current scene under the default name
    SaveScene,

    /// Replace the current scene with the default persisted one
    LoadScene,
}

/// Map a key press to a scene command
///
/// Unbound keys return `None`.
pub fn command_for_key(key: char) -> Option<SceneCommand> {
    match key {
        'w' => Some(SceneCommand::MoveCamera(Vec3::new(0.0, 0.0, -CAMERA_STEP))),
        's' => Some(SceneCommand::MoveCamera(Vec3::new(0.0, 0.0, CAMERA_STEP))),
        'a' => Some(SceneCommand::MoveCamera(Vec3::new(-CAMERA_STEP, 0.0, 0.0))),
        'd' => Some(SceneCommand::MoveCamera(Vec3::new(CAMERA_STEP, 0.0, 0.0))),
        'q' => Some(SceneCommand::RotateCamera {
            pitch: 0.0,
            yaw: -ROTATE_STEP,
        }),
        'e' => Some(SceneCommand::RotateCamera {
            pitch: 0.0,
            yaw: ROTATE_STEP,
        }),
        'r' => Some(SceneCommand::RotateCamera {
            pitch: -ROTATE_STEP,
            yaw: 0.0,
        }),
        'f' => Some(SceneCommand::RotateCamera {
            pitch: ROTATE_STEP,
            yaw: 0.0,
        }),
        '1' => Some(SceneCommand::SaveScene),
        '2' => Some(SceneCommand::LoadScene),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_keys() {
        assert_eq!(
            command_for_key('w'),
            Some(SceneCommand::MoveCamera(Vec3::new(0.0, 0.0, -CAMERA_STEP)))
        );
        assert_eq!(
            command_for_key('d'),
            Some(SceneCommand::MoveCamera(Vec3::new(CAMERA_STEP, 0.0, 0.0)))
        );
    }

    #[test]
    fn test_persistence_keys() {
        assert_eq!(command_for_key('1'), Some(SceneCommand::SaveScene));
        assert_eq!(command_for_key('2'), Some(SceneCommand::LoadScene));
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(command_for_key('x'), None);
    }
}
