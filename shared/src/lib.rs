pub mod animation;
pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod locomotion;
pub mod props;
pub mod simulation;
pub mod utils;

pub use animation::{AnimState, AnimationDirective, AnimationStateMachine, Clip, ClipId};
pub use camera::CameraRig;
pub use collision::{Aabb, EntityId, Pose, Quat, Vec2, Vec3};
pub use config::{
    AnimationMode, CameraConfig, IntentFrame, LocomotionConfig, PropCategory, PropsConfig,
    SimConfig,
};
pub use error::{ConfigError, EntityKind, KickLockError, SimError};
pub use input::{Direction, Intent, InputMapper};
pub use locomotion::{Avatar, LocomotionState};
pub use props::{KickCoordinator, KickState, Prop};
pub use simulation::{AvatarSnapshot, EntityDesc, PropSnapshot, Simulation, Snapshot};
pub use utils::{yaw_from_xz, yaw_rotation};
