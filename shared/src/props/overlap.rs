use super::prop::{KickState, Prop};
use crate::{
    collision::{CollisionScene, StaticCollider, Vec3, aabb, intersects},
    utils::planar_dir,
};

/// One pass of prop/prop separation.
///
/// For every unordered pair `(i, j)`, `i < j`, where both props are at rest or
/// tumbling and their boxes intersect, prop `j` is pushed away from prop `i` by
/// `step` along the planar center-to-center direction. Coincident centers push
/// along +X. A push that would put `j` into a static collider is skipped.
///
/// Returns the number of pushes applied.
pub fn resolve_overlaps(props: &mut [Prop], statics: &[StaticCollider], step: f32) -> usize {
    let walls = CollisionScene::new(statics, &[]);
    let mut pushes = 0;

    for i in 0..props.len() {
        for j in (i + 1)..props.len() {
            if !(separable(&props[i]) && separable(&props[j])) {
                continue;
            }

            let (a, b) = (props[i].aabb(), props[j].aabb());
            if !intersects(&a, &b) {
                continue;
            }

            let mut direction = planar_dir(aabb::center(&b) - aabb::center(&a));
            if direction == Vec3::zeros() {
                direction = Vec3::x();
            }
            let delta = direction * step;

            let mut moved = b;
            moved.mins += delta;
            moved.maxs += delta;
            if walls.query_walls(&moved) {
                continue;
            }

            props[j].shift(delta);
            pushes += 1;
        }
    }

    if pushes > 0 {
        log::trace!("overlap pass pushed {pushes} prop(s)");
    }
    pushes
}

#[inline]
fn separable(prop: &Prop) -> bool {
    matches!(prop.state, KickState::AtRest | KickState::Tumbling)
}
