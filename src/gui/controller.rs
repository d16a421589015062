use kiss3d::event::{Action, Key, WindowEvent};

use crate::model::SimulationState;

// Key config, all in one place
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_SPEED_UP: Key = Key::Up;
const KEY_SLOW_DOWN: Key = Key::Down;
const KEY_RESET: Key = Key::R;

/// Applies a window event to the playback controls. Returns whether the
/// event was one of ours.
pub fn process_event(event: &WindowEvent, state: &mut SimulationState) -> bool {
    match *event {
        WindowEvent::Key(key, Action::Press, _) => process_key(key, state),
        _ => false,
    }
}

pub fn process_key(key: Key, state: &mut SimulationState) -> bool {
    match key {
        KEY_TOGGLE_PAUSE => state.toggle_playing(),
        KEY_SPEED_UP => state.speed_up(),
        KEY_SLOW_DOWN => state.slow_down(),
        KEY_RESET => state.request_reset(),
        _ => return false,
    }
    true
}
