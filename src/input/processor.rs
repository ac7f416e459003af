//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! click/drag discrimination, held button, modifier keys) and the key-binding
//! map. It is the only thing that sits between raw window events and the
//! engine's [`execute`](crate::engine::LensEngine::execute) method.

use super::click::{ClickTracker, Motion};
use super::event::{InputEvent, MouseButton};
use super::keyboard::KeyAction;
use crate::engine::command::LensCommand;
use crate::options::{InputOptions, KeybindingOptions};

/// Converts raw window events into [`LensCommand`]s.
///
/// Left-drag orbits, shift+left-drag or right-drag pans, the wheel zooms,
/// and a left press/release without a drag becomes a
/// [`LensCommand::Click`] at the press position.
pub struct InputProcessor {
    clicks: ClickTracker,
    /// Button that started the active press.
    held: Option<MouseButton>,
    shift_pressed: bool,
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a processor from the input and keybinding options.
    #[must_use]
    pub fn new(input: &InputOptions, key_bindings: KeybindingOptions) -> Self {
        Self {
            clicks: ClickTracker::new(input.drag_threshold),
            held: None,
            shift_pressed: false,
            key_bindings,
        }
    }

    /// Look up a key press (winit `KeyCode` debug string or DOM
    /// `KeyboardEvent.code`, which share names).
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<KeyAction> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<LensCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => {
                (delta != 0.0).then_some(LensCommand::Zoom { delta })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<LensCommand> {
        let Motion::Drag(delta) = self.clicks.move_to(x, y) else {
            return None;
        };
        let pan = self.held == Some(MouseButton::Right)
            || (self.held == Some(MouseButton::Left) && self.shift_pressed);
        if pan {
            Some(LensCommand::PanCamera { delta })
        } else {
            Some(LensCommand::RotateCamera { delta })
        }
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<LensCommand> {
        if button == MouseButton::Middle {
            return None;
        }
        if pressed {
            if self.held.is_none() {
                self.held = Some(button);
                self.clicks.press();
            }
            return None;
        }
        if self.held != Some(button) {
            return None;
        }
        self.held = None;
        let at = self.clicks.release()?;
        (button == MouseButton::Left)
            .then_some(LensCommand::Click { x: at.x, y: at.y })
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(&InputOptions::default(), KeybindingOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn press(p: &mut InputProcessor, button: MouseButton) -> Option<LensCommand> {
        p.handle_event(InputEvent::MouseButton {
            button,
            pressed: true,
        })
    }

    fn release(p: &mut InputProcessor, button: MouseButton) -> Option<LensCommand> {
        p.handle_event(InputEvent::MouseButton {
            button,
            pressed: false,
        })
    }

    fn move_to(p: &mut InputProcessor, x: f32, y: f32) -> Option<LensCommand> {
        p.handle_event(InputEvent::CursorMoved { x, y })
    }

    #[test]
    fn press_release_in_place_is_a_click() {
        let mut p = InputProcessor::default();
        let _ = move_to(&mut p, 320.0, 240.0);
        assert_eq!(press(&mut p, MouseButton::Left), None);
        assert_eq!(
            release(&mut p, MouseButton::Left),
            Some(LensCommand::Click { x: 320.0, y: 240.0 })
        );
    }

    #[test]
    fn drag_rotates_and_suppresses_click() {
        let mut p = InputProcessor::default();
        let _ = move_to(&mut p, 0.0, 0.0);
        let _ = press(&mut p, MouseButton::Left);
        assert_eq!(
            move_to(&mut p, 30.0, 0.0),
            Some(LensCommand::RotateCamera {
                delta: Vec2::new(30.0, 0.0)
            })
        );
        assert_eq!(release(&mut p, MouseButton::Left), None);
    }

    #[test]
    fn shift_drag_and_right_drag_pan() {
        let mut p = InputProcessor::default();
        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = press(&mut p, MouseButton::Left);
        assert!(matches!(
            move_to(&mut p, 50.0, 0.0),
            Some(LensCommand::PanCamera { .. })
        ));
        let _ = release(&mut p, MouseButton::Left);

        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: false });
        let _ = press(&mut p, MouseButton::Right);
        assert!(matches!(
            move_to(&mut p, 0.0, 0.0),
            Some(LensCommand::PanCamera { .. })
        ));
        assert_eq!(release(&mut p, MouseButton::Right), None);
    }

    #[test]
    fn right_click_does_not_select() {
        let mut p = InputProcessor::default();
        let _ = press(&mut p, MouseButton::Right);
        assert_eq!(release(&mut p, MouseButton::Right), None);
    }

    #[test]
    fn scroll_zooms_and_keys_map_to_actions() {
        let mut p = InputProcessor::default();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.0 }),
            Some(LensCommand::Zoom { delta: 1.0 })
        );
        assert_eq!(p.handle_event(InputEvent::Scroll { delta: 0.0 }), None);
        assert_eq!(p.handle_key_press("Escape"), Some(KeyAction::ClearSelection));
        assert_eq!(p.handle_key_press("KeyO"), Some(KeyAction::OpenModel));
        assert_eq!(KeyAction::OpenModel.command(), None);
    }
}
