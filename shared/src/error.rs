use thiserror::Error;

use crate::collision::{EntityId, Vec3};

/// Rejected configuration. Raised before any simulation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },

    #[error("`{field}` must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("animation clip `{0}` is not among the loaded clips")]
    MissingClip(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Failure to register an entity with the simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("degenerate extent {extent:?} for {entity:?}; every half-extent must be positive")]
    DegenerateExtent { entity: EntityKind, extent: Vec3 },

    #[error("non-finite pose for {0:?}")]
    NonFinitePose(EntityKind),

    #[error("an avatar is already registered")]
    AvatarAlreadyRegistered,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Category named in registration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Avatar,
    Static,
    Prop,
    SlowZone,
}

/// Misuse of the kick coordinator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KickLockError {
    #[error("kick lock is held by {holder:?}")]
    Held { holder: EntityId },

    #[error("{requester:?} tried to release a kick lock it does not hold")]
    NotHolder { requester: EntityId },
}
