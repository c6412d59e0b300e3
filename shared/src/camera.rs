use crate::{
    collision::{Pose, Quat, Vec3},
    config::CameraConfig,
    constants::DIST_EPS,
};

/// Rigid follow camera: fixed offset from the avatar, always looking at it.
///
/// Camera rotations use the usual view convention: local -Z is the viewing
/// direction and +Y is up.
#[derive(Clone, Copy, Debug)]
pub struct CameraRig {
    pub offset: Vec3,
    /// Rotate `offset` by the avatar's orientation; otherwise it is a world offset.
    pub rotate_with_avatar: bool,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            offset: config.offset(),
            rotate_with_avatar: config.rotate_with_avatar,
        }
    }

    /// Camera pose for the committed avatar pose.
    pub fn update(&self, avatar: &Pose) -> Pose {
        let offset = if self.rotate_with_avatar {
            avatar.rotation * self.offset
        } else {
            self.offset
        };
        let eye = avatar.translation + offset;
        Pose::new(eye, look_at(eye, avatar.translation))
    }
}

/// Rotation whose -Z points from `eye` at `target`.
fn look_at(eye: Vec3, target: Vec3) -> Quat {
    let back = eye - target;
    if back.norm() <= DIST_EPS {
        return Quat::identity();
    }

    let up = if back.cross(&Vec3::y()).norm() <= DIST_EPS {
        Vec3::z()
    } else {
        Vec3::y()
    };
    Quat::face_towards(&back, &up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::yaw_rotation;
    use std::f32::consts::FRAC_PI_2;

    fn view_dir(pose: &Pose) -> Vec3 {
        pose.rotation * -Vec3::z()
    }

    #[test]
    fn camera_sits_at_offset_and_looks_at_avatar() {
        let rig = CameraRig::new(&CameraConfig::default());
        let avatar = Pose::from_translation(Vec3::new(1.0, 0.0, 2.0));
        let cam = rig.update(&avatar);

        assert!((cam.translation - (avatar.translation + rig.offset)).norm() < 1.0e-5);
        let expected = (avatar.translation - cam.translation).normalize();
        assert!((view_dir(&cam) - expected).norm() < 1.0e-5);
    }

    #[test]
    fn offset_follows_avatar_yaw() {
        let rig = CameraRig::new(&CameraConfig::default());
        let avatar = Pose::new(Vec3::zeros(), yaw_rotation(FRAC_PI_2));
        let cam = rig.update(&avatar);
        let expected = yaw_rotation(FRAC_PI_2) * rig.offset;
        assert!((cam.translation - expected).norm() < 1.0e-5);
    }

    #[test]
    fn world_offset_ignores_avatar_yaw() {
        let config = CameraConfig {
            rotate_with_avatar: false,
            ..Default::default()
        };
        let rig = CameraRig::new(&config);
        let avatar = Pose::new(Vec3::zeros(), yaw_rotation(1.2));
        let cam = rig.update(&avatar);
        assert!((cam.translation - rig.offset).norm() < 1.0e-5);
    }

    #[test]
    fn straight_down_view_has_finite_rotation() {
        let config = CameraConfig {
            offset: [0.0, 10.0, 0.0],
            ..Default::default()
        };
        let rig = CameraRig::new(&config);
        let cam = rig.update(&Pose::default());
        assert!((view_dir(&cam) - -Vec3::y()).norm() < 1.0e-5);
    }
}
