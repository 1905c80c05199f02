// Input handling system
//
// Maps keyboard input from the host window to rig actions.
//
// ## Architecture
//
// - `action`: Defines actions and default key bindings
// - `manager`: Looks up bindings and queues actions from winit key events
//
// ## Usage Example
//
// ```rust
// use engine::input::{InputManager, Action};
//
// let mut input_manager = InputManager::default();
//
// // In your event loop, process keyboard events
// input_manager.process_keyboard_event(&key_event);
//
// // Once per frame, apply what was pressed
// for action in input_manager.drain_actions() {
//     // ...
// }
// ```

pub mod action;
pub mod manager;

// Re-export commonly used types
pub use action::{Action, InputSource};
pub use manager::InputManager;
