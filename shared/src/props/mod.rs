/*!
Kickable props.

Submodules
- `prop`: the prop entity and its kick state.
- `kick`: the kick lock coordinator.
- `animator`: trigger detection, flight, settle.
- `overlap`: per-tick prop/prop separation.

Lifecycle: `AtRest -> Launched -> Tumbling -> Settling -> AtRest (settled)`.
An abort on collision returns a prop to `AtRest` from `Launched` or `Tumbling`
without settling it.
*/

pub mod animator;
pub mod kick;
pub mod overlap;
pub mod prop;

pub use animator::{advance_kicks, try_trigger};
pub use kick::KickCoordinator;
pub use overlap::resolve_overlaps;
pub use prop::{KickState, Prop};
