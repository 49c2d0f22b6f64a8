use glium::glutin::event::{ElementState, VirtualKeyCode};
use rayfan::MoveIntent;

/// Tracks which of the keys controlling the lift are held down.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiftController {
    intent: MoveIntent,
    reset_requested: bool,
}

impl LiftController {
    #[inline]
    pub const fn new() -> Self {
        Self {
            intent: MoveIntent::NONE,
            reset_requested: false,
        }
    }

    /// Returns whether `key` is one of the lift's controls.
    pub fn process_keyboard(&mut self, key: VirtualKeyCode, state: ElementState) -> bool {
        use VirtualKeyCode::*;

        let pressed = state == ElementState::Pressed;

        match key {
            Up => self.intent.up = pressed,
            Down => self.intent.down = pressed,
            R => self.reset_requested |= pressed,
            _ => return false,
        }

        true
    }

    #[inline]
    pub const fn intent(&self) -> MoveIntent {
        self.intent
    }

    /// Returns whether a reset was requested since the last call.
    #[inline]
    pub fn take_reset(&mut self) -> bool {
        core::mem::take(&mut self.reset_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_can_be_held_together() {
        let mut controller = LiftController::new();

        assert!(controller.process_keyboard(VirtualKeyCode::Up, ElementState::Pressed));
        assert!(controller.process_keyboard(VirtualKeyCode::Down, ElementState::Pressed));
        assert_eq!(
            controller.intent(),
            MoveIntent {
                up: true,
                down: true
            }
        );

        controller.process_keyboard(VirtualKeyCode::Up, ElementState::Released);
        assert_eq!(controller.intent(), MoveIntent::DOWN);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut controller = LiftController::new();
        assert!(!controller.process_keyboard(VirtualKeyCode::Space, ElementState::Pressed));
        assert_eq!(controller.intent(), MoveIntent::NONE);
    }

    #[test]
    fn reset_is_taken_once() {
        let mut controller = LiftController::new();
        controller.process_keyboard(VirtualKeyCode::R, ElementState::Pressed);
        controller.process_keyboard(VirtualKeyCode::R, ElementState::Released);
        assert!(controller.take_reset());
        assert!(!controller.take_reset());
    }
}
