/*!
Input mapper: four semantic directions to a normalized movement intent.

The mapper only holds pressed/released state. It knows nothing about keys;
the input source translates its own key codes to [`Direction`] and calls
[`InputMapper::key_down`] / [`InputMapper::key_up`].

Intent space is the avatar's planar frame: `x` is right, `y` is forward.
*/

use crate::collision::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

/// Per-tick movement request consumed by the locomotion controller.
///
/// Forward/strafe and backward are kept apart because they are resolved as two
/// independent moves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Forward + strafe, normalized (or zero).
    pub planar: Vec2,
    /// Backward requested this tick.
    pub backward: bool,
}

impl Intent {
    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.backward && self.planar == Vec2::zeros()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InputMapper {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn key_down(&mut self, direction: Direction) {
        self.set(direction, true);
    }

    #[inline]
    pub fn key_up(&mut self, direction: Direction) {
        self.set(direction, false);
    }

    /// Clear every direction (e.g. on window focus loss).
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// All active directions combined and normalized. Zero when nothing (or only
    /// opposing pairs) is held.
    pub fn intent_vector(&self) -> Vec2 {
        normalize_or_zero(Vec2::new(
            axis(self.right, self.left),
            axis(self.forward, self.backward),
        ))
    }

    /// Split intent: forward/strafe vector plus the backward bit.
    pub fn intent(&self) -> Intent {
        Intent {
            planar: normalize_or_zero(Vec2::new(
                axis(self.right, self.left),
                if self.forward { 1.0 } else { 0.0 },
            )),
            backward: self.backward,
        }
    }

    fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Forward => self.forward = pressed,
            Direction::Backward => self.backward = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }
}

#[inline]
fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

#[inline]
fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.norm();
    if len > 0.0 { v / len } else { Vec2::zeros() }
}
