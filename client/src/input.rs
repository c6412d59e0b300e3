use bevy::{prelude::*, window::WindowFocused};
use leafwing_input_manager::prelude::*;
use shared::Direction;

use crate::world::{SimWorld, tick_simulation};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
}

impl InputAction {
    const ALL: [InputAction; 4] = [
        InputAction::Forward,
        InputAction::Backward,
        InputAction::Left,
        InputAction::Right,
    ];

    fn direction(self) -> Direction {
        match self {
            InputAction::Forward => Direction::Forward,
            InputAction::Backward => Direction::Backward,
            InputAction::Left => Direction::Left,
            InputAction::Right => Direction::Right,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let input_map = InputMap::new([
        (InputAction::Forward, KeyCode::KeyW),
        (InputAction::Forward, KeyCode::ArrowUp),
        (InputAction::Backward, KeyCode::KeyS),
        (InputAction::Backward, KeyCode::ArrowDown),
        (InputAction::Left, KeyCode::KeyA),
        (InputAction::Left, KeyCode::ArrowLeft),
        (InputAction::Right, KeyCode::KeyD),
        (InputAction::Right, KeyCode::ArrowRight),
    ]);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(
        Update,
        (release_on_focus_loss, feed_directions)
            .chain()
            .before(tick_simulation)
            .run_if(resource_exists::<SimWorld>),
    );
}

/// Forward press/release edges to the simulation's input mapper.
fn feed_directions(actions: Res<ActionState<InputAction>>, mut world: ResMut<SimWorld>) {
    let mapper = world.sim.input_mut();
    for action in InputAction::ALL {
        if actions.just_pressed(&action) {
            mapper.key_down(action.direction());
        }
        if actions.just_released(&action) {
            mapper.key_up(action.direction());
        }
    }
}

/// Key-up events are lost while unfocused, so drop everything held.
fn release_on_focus_loss(mut focus: MessageReader<WindowFocused>, mut world: ResMut<SimWorld>) {
    if focus.read().any(|event| !event.focused) {
        world.sim.input_mut().release_all();
        debug!("window lost focus; released all directions");
    }
}
