//! Input handling and gesture bindings
//!
//! Keystrokes from the user's terminal are checked against the gesture
//! keymap; anything that is not a gesture passes through to the shell.

pub mod gesture_handler;
pub mod handler;
pub mod keymap;

pub use gesture_handler::GestureHandler;
pub use handler::HandlerAction;
pub use keymap::{create_default_keymap, create_keymap, parse_gesture, KeyAction, KeySequence};
