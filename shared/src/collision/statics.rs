use super::{
    aabb::{compute_aabb, contains_point, intersects},
    types::{Aabb, EntityId, Pose, Vec3},
};
use crate::props::Prop;

/// Immutable world obstacle (wall, tent, crate).
///
/// Created once by the scene loader and never destroyed during a session.
#[derive(Clone, Copy, Debug)]
pub struct StaticCollider {
    pub pose: Pose,
    /// Local half-extents of the collision box.
    pub half_extents: Vec3,
}

impl StaticCollider {
    #[inline]
    pub fn new(pose: Pose, half_extents: Vec3) -> Self {
        Self { pose, half_extents }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        compute_aabb(&self.pose, self.half_extents)
    }
}

/// A volume that scales locomotion speed while the avatar stands in it.
#[derive(Clone, Copy, Debug)]
pub struct SlowZone {
    pub pose: Pose,
    pub half_extents: Vec3,
    /// Per-zone multiplier; `None` uses the configured default.
    pub multiplier: Option<f32>,
}

impl SlowZone {
    #[inline]
    pub fn contains(&self, point: &Vec3) -> bool {
        contains_point(&compute_aabb(&self.pose, self.half_extents), point)
    }
}

/// Read-only view of everything a moving entity may collide with this tick.
///
/// Built fresh from the live entity collections for each query, so it always
/// sees current prop poses.
#[derive(Clone, Copy)]
pub struct CollisionScene<'a> {
    pub statics: &'a [StaticCollider],
    pub props: &'a [Prop],
}

impl<'a> CollisionScene<'a> {
    #[inline]
    pub fn new(statics: &'a [StaticCollider], props: &'a [Prop]) -> Self {
        Self { statics, props }
    }

    /// Returns true if `candidate` intersects any static collider or settled prop
    /// other than `exclude`.
    ///
    /// Linear scan; scenes hold tens of colliders, not thousands.
    pub fn query_static(&self, candidate: &Aabb, exclude: Option<EntityId>) -> bool {
        let statics_hit = self
            .statics
            .iter()
            .enumerate()
            .filter(|(i, _)| exclude != Some(EntityId::Static(*i as u32)))
            .any(|(_, s)| intersects(candidate, &s.aabb()));

        if statics_hit {
            return true;
        }

        self.props
            .iter()
            .enumerate()
            .filter(|(i, _)| exclude != Some(EntityId::Prop(*i as u32)))
            .filter(|(_, p)| p.is_obstacle())
            .any(|(_, p)| intersects(candidate, &p.aabb()))
    }

    /// Same as [`Self::query_static`] but ignores props entirely.
    pub fn query_walls(&self, candidate: &Aabb) -> bool {
        self.statics
            .iter()
            .any(|s| intersects(candidate, &s.aabb()))
    }
}

/// Lowest speed multiplier among the zones containing `point`, if any.
pub fn slow_zone_multiplier(zones: &[SlowZone], point: &Vec3, default: f32) -> Option<f32> {
    zones
        .iter()
        .filter(|z| z.contains(point))
        .map(|z| z.multiplier.unwrap_or(default))
        .reduce(f32::min)
}
