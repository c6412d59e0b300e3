/*!
Collision root module.

Everything the core collides with is an axis-aligned box derived on demand
from a pose and half-extents. The code is split for clarity:

- types:   shared math aliases, `Pose` and `EntityId`
- aabb:    pure bounds derivation and overlap helpers
- statics: static colliders, slow zones and the per-query collision scene
*/

pub mod aabb;
pub mod statics;
pub mod types;

// Re-export commonly used types and functions.
pub use aabb::{compute_aabb, contains_point, intersects, scaled_about_center, upright_aabb};
pub use statics::{CollisionScene, SlowZone, StaticCollider, slow_zone_multiplier};
pub use types::{Aabb, EntityId, Iso, Pose, Quat, Vec2, Vec3};
