//! Default tuning values. Every one of these is overridable through `SimConfig`.

/// Avatar walking speed in meters per second (0.1 m per frame at 60 Hz).
pub const DEFAULT_BASE_SPEED: f32 = 6.0;

/// Fraction of the remaining yaw error closed each tick while turning.
pub const DEFAULT_TURN_RATE: f32 = 0.057;

/// Speed multiplier applied inside slow zones that don't override it.
pub const DEFAULT_SLOW_ZONE_MULTIPLIER: f32 = 0.5;

/// Avatar collision half-extents (meters).
pub const DEFAULT_AVATAR_HALF_EXTENTS: [f32; 3] = [0.3, 0.9, 0.3];

/// Cross-fade duration between idle and walk clips (seconds).
pub const DEFAULT_CROSSFADE_SECS: f32 = 0.7;

/// Fade-in of the contact clip when the avatar is blocked (seconds).
pub const DEFAULT_BLOCKED_FADE_IN_SECS: f32 = 0.01;

/// Fade-out of the previous clip when the avatar is blocked (seconds).
pub const DEFAULT_BLOCKED_FADE_OUT_SECS: f32 = 0.07;

/// Playback speed of the walk clip relative to its authored rate.
pub const DEFAULT_WALK_TIME_SCALE: f32 = 1.3;

/// Duration of a kick flight from launch to landing (seconds).
pub const DEFAULT_KICK_SECS: f32 = 1.0;

/// Duration of the eased settle onto the ground (seconds).
pub const DEFAULT_SETTLE_SECS: f32 = 0.4;

/// Yaw spin applied while tumbling (radians per second).
pub const DEFAULT_SPIN_RATE: f32 = 9.0;

/// Maximum absolute roll while tumbling (radians).
pub const DEFAULT_MAX_TILT: f32 = 0.35;

/// Maximum roll change per tick of the tumble random walk (radians).
pub const DEFAULT_ROLL_JITTER: f32 = 0.08;

/// Maximum absolute yaw/roll offset added after settling (radians).
pub const DEFAULT_REST_JITTER: f32 = 0.15;

/// Distance a prop is pushed per tick when overlapping another prop (meters).
pub const DEFAULT_MIN_SEPARATION_STEP: f32 = 0.05;

/// Kick force (trajectory length in meters) for bottles.
pub const BOTTLE_KICK_FORCE: f32 = 7.8;
/// Resting center height for bottles (meters).
pub const BOTTLE_GROUND_HEIGHT: f32 = 0.1;
/// Bottles are small; enlarge the avatar box so they're easy to hit.
pub const BOTTLE_TRIGGER_SCALE: f32 = 1.5;

/// Kick force (trajectory length in meters) for trash bags and cans.
pub const TRASH_KICK_FORCE: f32 = 4.5;
/// Resting center height for trash (meters).
pub const TRASH_GROUND_HEIGHT: f32 = 0.25;
pub const TRASH_TRIGGER_SCALE: f32 = 1.0;

/// Camera offset in avatar-local space: behind, above and over the right shoulder.
pub const DEFAULT_CAMERA_OFFSET: [f32; 3] = [-3.7, 5.1, -10.0];

/// Seed for the simulation's random stream.
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_cafe;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;
