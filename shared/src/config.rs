/*!
Simulation configuration.

Every tunable the scene variants disagree on lives here rather than in code:
speeds, fade timings, per-category kick tuning, camera offset. Values load
from RON (missing fields fall back to the defaults in `constants`) and are
validated once, before the first tick. A config that would produce NaN poses
(zero durations, non-finite numbers, degenerate extents) is rejected.
*/

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::{
    collision::Vec3,
    constants::*,
    error::ConfigError,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub locomotion: LocomotionConfig,
    pub animation: AnimationConfig,
    pub props: PropsConfig,
    pub camera: CameraConfig,
    /// Seed for tumble roll and rest jitter.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            locomotion: LocomotionConfig::default(),
            animation: AnimationConfig::default(),
            props: PropsConfig::default(),
            camera: CameraConfig::default(),
            seed: DEFAULT_RNG_SEED,
        }
    }
}

/// How the forward/strafe intent is turned into a world direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentFrame {
    /// Rotated by the avatar's current orientation (avatar faces local +Z).
    #[default]
    Local,
    /// Fixed screen mapping: forward is -Z, right is +X.
    World,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Meters per second.
    pub base_speed: f32,
    /// Per-tick interpolation factor toward the target yaw, in (0, 1].
    pub turn_rate: f32,
    /// Default multiplier for slow zones without their own.
    pub slow_zone_multiplier: f32,
    pub intent_frame: IntentFrame,
    pub avatar_half_extents: [f32; 3],
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            base_speed: DEFAULT_BASE_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            slow_zone_multiplier: DEFAULT_SLOW_ZONE_MULTIPLIER,
            intent_frame: IntentFrame::Local,
            avatar_half_extents: DEFAULT_AVATAR_HALF_EXTENTS,
        }
    }
}

impl LocomotionConfig {
    #[inline]
    pub fn avatar_half_extents(&self) -> Vec3 {
        Vec3::from(self.avatar_half_extents)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Idle/walk/contact clips with timed cross-fades.
    #[default]
    Crossfade,
    /// A single clip started while any key is held and stopped otherwise.
    Discrete,
}

/// Names of the loader-supplied clips bound to each animation state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipBindings {
    pub idle: String,
    pub walk: String,
    pub contact: String,
}

impl Default for ClipBindings {
    fn default() -> Self {
        Self {
            idle: "Idle".into(),
            walk: "Walk".into(),
            contact: "Contact".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub mode: AnimationMode,
    pub crossfade_secs: f32,
    pub blocked_fade_in_secs: f32,
    pub blocked_fade_out_secs: f32,
    pub walk_time_scale: f32,
    pub clips: ClipBindings,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mode: AnimationMode::Crossfade,
            crossfade_secs: DEFAULT_CROSSFADE_SECS,
            blocked_fade_in_secs: DEFAULT_BLOCKED_FADE_IN_SECS,
            blocked_fade_out_secs: DEFAULT_BLOCKED_FADE_OUT_SECS,
            walk_time_scale: DEFAULT_WALK_TIME_SCALE,
            clips: ClipBindings::default(),
        }
    }
}

/// Prop categories with distinct kick tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropCategory {
    Bottle,
    Trash,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PropTuning {
    /// Length of the kick trajectory (meters).
    pub kick_force: f32,
    /// Minimum center height while tumbling and the resting height after settling.
    pub ground_height: f32,
    /// Factor applied to the avatar box when testing for a kick.
    pub trigger_scale: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PropsConfig {
    pub kick_secs: f32,
    pub settle_secs: f32,
    pub spin_rate: f32,
    pub max_tilt: f32,
    pub roll_jitter: f32,
    pub rest_jitter: f32,
    pub min_separation_step: f32,
    pub bottle: PropTuning,
    pub trash: PropTuning,
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            kick_secs: DEFAULT_KICK_SECS,
            settle_secs: DEFAULT_SETTLE_SECS,
            spin_rate: DEFAULT_SPIN_RATE,
            max_tilt: DEFAULT_MAX_TILT,
            roll_jitter: DEFAULT_ROLL_JITTER,
            rest_jitter: DEFAULT_REST_JITTER,
            min_separation_step: DEFAULT_MIN_SEPARATION_STEP,
            bottle: PropTuning {
                kick_force: BOTTLE_KICK_FORCE,
                ground_height: BOTTLE_GROUND_HEIGHT,
                trigger_scale: BOTTLE_TRIGGER_SCALE,
            },
            trash: PropTuning {
                kick_force: TRASH_KICK_FORCE,
                ground_height: TRASH_GROUND_HEIGHT,
                trigger_scale: TRASH_TRIGGER_SCALE,
            },
        }
    }
}

impl PropsConfig {
    #[inline]
    pub fn tuning(&self, category: PropCategory) -> &PropTuning {
        match category {
            PropCategory::Bottle => &self.bottle,
            PropCategory::Trash => &self.trash,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub offset: [f32; 3],
    /// When false the offset is applied in world space.
    pub rotate_with_avatar: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_CAMERA_OFFSET,
            rotate_with_avatar: true,
        }
    }
}

impl CameraConfig {
    #[inline]
    pub fn offset(&self) -> Vec3 {
        Vec3::from(self.offset)
    }
}

impl SimConfig {
    /// Parse a RON document and validate it.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = ron::de::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or corrupt the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        positive("locomotion.base_speed", loco.base_speed)?;
        in_range("locomotion.turn_rate", loco.turn_rate, f32::EPSILON, 1.0)?;
        in_range(
            "locomotion.slow_zone_multiplier",
            loco.slow_zone_multiplier,
            f32::EPSILON,
            1.0,
        )?;
        for half in loco.avatar_half_extents {
            positive("locomotion.avatar_half_extents", half)?;
        }

        let anim = &self.animation;
        positive("animation.crossfade_secs", anim.crossfade_secs)?;
        positive("animation.blocked_fade_in_secs", anim.blocked_fade_in_secs)?;
        positive("animation.blocked_fade_out_secs", anim.blocked_fade_out_secs)?;
        positive("animation.walk_time_scale", anim.walk_time_scale)?;

        let props = &self.props;
        positive("props.kick_secs", props.kick_secs)?;
        positive("props.settle_secs", props.settle_secs)?;
        positive("props.min_separation_step", props.min_separation_step)?;
        finite("props.spin_rate", props.spin_rate)?;
        in_range("props.max_tilt", props.max_tilt, 0.0, FRAC_PI_2)?;
        in_range("props.roll_jitter", props.roll_jitter, 0.0, FRAC_PI_2)?;
        in_range("props.rest_jitter", props.rest_jitter, 0.0, FRAC_PI_2)?;
        validate_tuning(
            &props.bottle,
            [
                "props.bottle.kick_force",
                "props.bottle.ground_height",
                "props.bottle.trigger_scale",
            ],
        )?;
        validate_tuning(
            &props.trash,
            [
                "props.trash.kick_force",
                "props.trash.ground_height",
                "props.trash.trigger_scale",
            ],
        )?;

        for c in self.camera.offset {
            finite("camera.offset", c)?;
        }
        positive("camera.offset (length)", self.camera.offset().norm())?;

        Ok(())
    }
}

fn validate_tuning(tuning: &PropTuning, fields: [&'static str; 3]) -> Result<(), ConfigError> {
    let [kick_force, ground_height, trigger_scale] = fields;
    positive(kick_force, tuning.kick_force)?;
    finite(ground_height, tuning.ground_height)?;
    positive(trigger_scale, tuning.trigger_scale)?;
    Ok(())
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
