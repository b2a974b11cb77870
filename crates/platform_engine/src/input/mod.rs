//! Input management system
//!
//! Device events are folded into an [`InputState`] snapshot which game code
//! reads once per tick through the `active()` predicates.

/// Analog values at or below this magnitude read as inactive
pub const ANALOG_DEAD_ZONE: f32 = 0.2;

/// One analog axis direction, normalized to `0.0..=1.0`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalogInput {
    /// Current deflection
    pub value: f32,
    /// Became active since the last cleared snapshot
    pub just_triggered: bool,
}

impl AnalogInput {
    /// True when deflected past the dead zone
    pub fn active(&self) -> bool {
        self.value > ANALOG_DEAD_ZONE
    }

    fn set(&mut self, value: f32) {
        let was_active = self.active();
        self.value = value.clamp(0.0, 1.0);
        if self.active() && !was_active {
            self.just_triggered = true;
        }
    }
}

/// One button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitalInput {
    /// Currently held
    pub pressed: bool,
    /// Pressed since the last cleared snapshot
    pub just_triggered: bool,
}

impl DigitalInput {
    /// True while held
    pub fn active(&self) -> bool {
        self.pressed
    }

    fn set(&mut self, pressed: bool) {
        if pressed && !self.pressed {
            self.just_triggered = true;
        }
        self.pressed = pressed;
    }
}

/// Per-tick input snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Up direction
    pub up: AnalogInput,
    /// Down direction
    pub down: AnalogInput,
    /// Left direction
    pub left: AnalogInput,
    /// Right direction
    pub right: AnalogInput,
    /// Primary action button
    pub primary_action: DigitalInput,
    /// Secondary action button
    pub secondary_action: DigitalInput,
}

impl InputState {
    fn clear_triggers(&mut self) {
        for axis in [&mut self.up, &mut self.down, &mut self.left, &mut self.right] {
            axis.just_triggered = false;
        }
        self.primary_action.just_triggered = false;
        self.secondary_action.just_triggered = false;
    }
}

/// Analog directions an axis or key can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Up
    Up,
    /// Down
    Down,
    /// Left
    Left,
    /// Right
    Right,
}

/// Input manager
#[derive(Debug, Default)]
pub struct InputManager {
    state: InputState,
}

impl InputManager {
    /// Create a new input manager with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key input.
    ///
    /// Returns false for keys with no binding.
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) -> bool {
        let value = if pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::Up | KeyCode::W => self.set_analog(Direction::Up, value),
            KeyCode::Down | KeyCode::S => self.set_analog(Direction::Down, value),
            KeyCode::Left | KeyCode::A => self.set_analog(Direction::Left, value),
            KeyCode::Right | KeyCode::D => self.set_analog(Direction::Right, value),
            KeyCode::Space => self.state.primary_action.set(pressed),
            KeyCode::Enter => self.state.secondary_action.set(pressed),
            _ => return false,
        }
        true
    }

    /// Set one analog direction directly (gamepad sticks)
    pub fn set_analog(&mut self, direction: Direction, value: f32) {
        let axis = match direction {
            Direction::Up => &mut self.state.up,
            Direction::Down => &mut self.state.down,
            Direction::Left => &mut self.state.left,
            Direction::Right => &mut self.state.right,
        };
        axis.set(value);
    }

    /// Current snapshot; with `clear_new_flags` the just-triggered flags are
    /// reset after copying so each edge is reported once.
    pub fn state(&mut self, clear_new_flags: bool) -> InputState {
        let snapshot = self.state;
        if clear_new_flags {
            self.state.clear_triggers();
        }
        snapshot
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}
