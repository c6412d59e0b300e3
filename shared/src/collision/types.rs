/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the AABB helpers (bounds derivation and overlap tests)
- the static query (avatar and prop move validation)
- the locomotion controller and prop animator

Notes:
- Bounds are never stored on an entity. Every query derives a fresh `Aabb`
  from the entity's current `Pose` and its local half-extents, so a prop that
  moved this tick can never be tested with last tick's box.
- Extents are half-extents (center to face), matching parry's `Cuboid`.
*/

use nalgebra as na;

pub use rapier3d::parry::bounding_volume::Aabb;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid pose (isometry) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pose at `translation` with identity rotation.
    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// Pose at `translation` rotated by `yaw` radians about +Y.
    #[inline]
    pub fn from_yaw(translation: Vec3, yaw: f32) -> Self {
        Self::new(
            translation,
            Quat::from_axis_angle(&Vec3::y_axis(), yaw),
        )
    }

    /// Convert to nalgebra `Isometry3` for use with parry bounds.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }

    /// World-space facing direction (local +Z).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_translation(Vec3::zeros())
    }
}

/// Tagged handle for every entity category the simulation owns.
///
/// Collision queries take an optional `EntityId` to exclude so an entity never
/// collides with itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    Avatar,
    Static(u32),
    Prop(u32),
    SlowZone(u32),
}
