/*!
Animation state machine.

Maps the avatar's locomotion state to clips and emits directives for an
external mixer. The machine owns which clip is current and its play time; it
never blends weights itself.

Notes:
- `Crossfade` mode binds three clips (idle, walk, contact). Every transition
  cross-fades over `crossfade_secs` except entering `Blocked`, which fades the
  contact clip in near-instantly and pins it at its midpoint, paused.
- `Discrete` mode binds only the walk clip: it starts when any direction is
  held and stops exactly once when all are released.
- Clips are resolved by name against the loader-supplied list at construction;
  an unknown name is a configuration error, not a runtime miss.
*/

use crate::{
    config::{AnimationConfig, AnimationMode},
    error::ConfigError,
    locomotion::LocomotionState,
};

/// Index into the clip list handed to [`AnimationStateMachine::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipId(pub usize);

/// Named animation supplied by the asset loader.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub name: String,
    /// Seconds at time scale 1.
    pub duration: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimState {
    #[default]
    Idle,
    Moving,
    Blocked,
}

impl From<LocomotionState> for AnimState {
    fn from(state: LocomotionState) -> Self {
        match state {
            LocomotionState::Idle => AnimState::Idle,
            LocomotionState::Walking | LocomotionState::WalkingBackward => AnimState::Moving,
            LocomotionState::Blocked => AnimState::Blocked,
        }
    }
}

/// Instruction for the external mixer, emitted once per update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationDirective {
    /// Keep playing whatever is current.
    Maintain,
    /// Fade `from` out and `to` in, playing `to` from the start at `time_scale`.
    CrossFade {
        from: Option<ClipId>,
        to: ClipId,
        fade_out: f32,
        fade_in: f32,
        time_scale: f32,
    },
    /// Fade `to` in and hold it paused at `time` seconds.
    Pin {
        from: Option<ClipId>,
        to: ClipId,
        fade_out: f32,
        fade_in: f32,
        time: f32,
    },
    Start(ClipId),
    Stop(ClipId),
}

#[derive(Clone, Copy, Debug)]
enum Bindings {
    Crossfade {
        idle: ClipId,
        walk: ClipId,
        contact: ClipId,
    },
    Discrete {
        walk: ClipId,
    },
}

#[derive(Clone, Debug)]
pub struct AnimationStateMachine {
    clips: Vec<Clip>,
    bindings: Bindings,
    crossfade_secs: f32,
    blocked_fade_in_secs: f32,
    blocked_fade_out_secs: f32,
    walk_time_scale: f32,

    /// `None` until the first update has emitted its directive.
    state: Option<AnimState>,
    current: Option<ClipId>,
    play_time: f32,
    time_scale: f32,
    paused: bool,
}

impl AnimationStateMachine {
    pub fn new(config: &AnimationConfig, clips: Vec<Clip>) -> Result<Self, ConfigError> {
        for clip in &clips {
            if !clip.duration.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: "clip.duration",
                });
            }
            if clip.duration <= 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "clip.duration",
                    value: clip.duration,
                });
            }
        }

        let names = &config.clips;
        let bindings = match config.mode {
            AnimationMode::Crossfade => Bindings::Crossfade {
                idle: resolve(&clips, &names.idle)?,
                walk: resolve(&clips, &names.walk)?,
                contact: resolve(&clips, &names.contact)?,
            },
            AnimationMode::Discrete => Bindings::Discrete {
                walk: resolve(&clips, &names.walk)?,
            },
        };

        Ok(Self {
            clips,
            bindings,
            crossfade_secs: config.crossfade_secs,
            blocked_fade_in_secs: config.blocked_fade_in_secs,
            blocked_fade_out_secs: config.blocked_fade_out_secs,
            walk_time_scale: config.walk_time_scale,
            state: None,
            current: None,
            play_time: 0.0,
            time_scale: 1.0,
            paused: false,
        })
    }

    /// Drive the machine for one tick.
    ///
    /// `any_pressed` is raw key activity; only `Discrete` mode reads it.
    pub fn update(
        &mut self,
        locomotion: LocomotionState,
        any_pressed: bool,
        dt_seconds: f32,
    ) -> AnimationDirective {
        match self.bindings {
            Bindings::Crossfade {
                idle,
                walk,
                contact,
            } => self.update_crossfade(locomotion.into(), [idle, walk, contact], dt_seconds),
            Bindings::Discrete { walk } => self.update_discrete(walk, any_pressed, dt_seconds),
        }
    }

    fn update_crossfade(
        &mut self,
        target: AnimState,
        [idle, walk, contact]: [ClipId; 3],
        dt: f32,
    ) -> AnimationDirective {
        if self.state == Some(target) {
            self.advance(dt);
            return AnimationDirective::Maintain;
        }

        let from = self.current;
        self.state = Some(target);

        match target {
            AnimState::Blocked => {
                let time = self.clip(contact).duration * 0.5;
                self.begin(contact, time, 1.0, true);
                AnimationDirective::Pin {
                    from,
                    to: contact,
                    fade_out: self.blocked_fade_out_secs,
                    fade_in: self.blocked_fade_in_secs,
                    time,
                }
            }
            AnimState::Moving | AnimState::Idle => {
                let (to, time_scale) = if target == AnimState::Moving {
                    (walk, self.walk_time_scale)
                } else {
                    (idle, 1.0)
                };
                self.begin(to, 0.0, time_scale, false);
                AnimationDirective::CrossFade {
                    from,
                    to,
                    fade_out: self.crossfade_secs,
                    fade_in: self.crossfade_secs,
                    time_scale,
                }
            }
        }
    }

    fn update_discrete(&mut self, walk: ClipId, any_pressed: bool, dt: f32) -> AnimationDirective {
        let playing = self.current.is_some();
        match (any_pressed, playing) {
            (true, false) => {
                self.state = Some(AnimState::Moving);
                self.begin(walk, 0.0, self.walk_time_scale, false);
                AnimationDirective::Start(walk)
            }
            (false, true) => {
                self.state = Some(AnimState::Idle);
                self.current = None;
                self.play_time = 0.0;
                AnimationDirective::Stop(walk)
            }
            _ => {
                self.state.get_or_insert(AnimState::Idle);
                self.advance(dt);
                AnimationDirective::Maintain
            }
        }
    }

    fn begin(&mut self, clip: ClipId, time: f32, time_scale: f32, paused: bool) {
        self.current = Some(clip);
        self.play_time = time;
        self.time_scale = time_scale;
        self.paused = paused;
    }

    fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        if let Some(id) = self.current {
            let duration = self.clip(id).duration;
            self.play_time = (self.play_time + dt.max(0.0) * self.time_scale).rem_euclid(duration);
        }
    }

    /// Current state, `Idle` before the first update.
    pub fn state(&self) -> AnimState {
        self.state.unwrap_or_default()
    }

    pub fn current_clip(&self) -> Option<ClipId> {
        self.current
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Clip ids always come from this machine, so indexing cannot miss.
    pub fn clip(&self, id: ClipId) -> &Clip {
        &self.clips[id.0]
    }
}

fn resolve(clips: &[Clip], name: &str) -> Result<ClipId, ConfigError> {
    clips
        .iter()
        .position(|c| c.name == name)
        .map(ClipId)
        .ok_or_else(|| ConfigError::MissingClip(name.to_owned()))
}
