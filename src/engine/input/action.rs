// Rig actions and default key bindings

use winit::keyboard::KeyCode;

/// Represents every action the host window can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Pose
    TiltLeft,
    TiltRight,
    DefaultPosition,

    // Meta
    Quit,
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowLeft), Action::TiltLeft),
        (InputSource::key(KeyCode::KeyA), Action::TiltLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::TiltRight),
        (InputSource::key(KeyCode::KeyD), Action::TiltRight),
        (InputSource::key(KeyCode::ArrowDown), Action::DefaultPosition),
        (InputSource::key(KeyCode::Space), Action::DefaultPosition),
        (InputSource::key(KeyCode::Escape), Action::Quit),
    ]
}
