use crate::scene::camera::{CameraInput, MouseDrag};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window};

/// One-shot commands bound to function keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleRotation,
    CycleShadingMode,
    ToggleNormalMap,
    ToggleDepthVisualization,
    ToggleBoundingBoxVisualization,
    CycleCullMode,
    ToggleUniformClearColor,
    ToggleFpsLogging,
    ReloadConfig,
}

const BINDINGS: [(Key, Action); 9] = [
    (Key::F2, Action::ToggleRotation),
    (Key::F5, Action::CycleShadingMode),
    (Key::F6, Action::ToggleNormalMap),
    (Key::F7, Action::ToggleDepthVisualization),
    (Key::F8, Action::ToggleBoundingBoxVisualization),
    (Key::F9, Action::CycleCullMode),
    (Key::F10, Action::ToggleUniformClearColor),
    (Key::F11, Action::ToggleFpsLogging),
    (Key::R, Action::ReloadConfig),
];

pub const CONTROLS_HELP: &str = "WASD/Arrows=Move, Q/E=Down/Up, LeftShift=Boost, \
RMB=Look, LMB=Yaw+Dolly, LMB+RMB=Lift, F2=Rotation, F5=Shading, F6=Normal map, \
F7=Depth, F8=Bounding boxes, F9=Cull mode, F10=Clear color, F11=FPS, R=Reload";

/// Which drag gesture the held mouse buttons select.
pub fn drag_mode(left: bool, right: bool) -> MouseDrag {
    match (left, right) {
        (true, true) => MouseDrag::Lift,
        (true, false) => MouseDrag::Dolly,
        (false, true) => MouseDrag::Look,
        (false, false) => MouseDrag::None,
    }
}

/// Translates minifb window state into renderer-agnostic input.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_mouse_pos: Option<(f32, f32)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples held keys and mouse motion for this frame.
    pub fn camera_input(&mut self, window: &Window) -> CameraInput {
        let down = |keys: &[Key]| keys.iter().any(|k| window.is_key_down(*k));

        let drag = drag_mode(
            window.get_mouse_down(MouseButton::Left),
            window.get_mouse_down(MouseButton::Right),
        );
        let mouse_pos = window.get_mouse_pos(MouseMode::Pass);

        CameraInput {
            forward: down(&[Key::W, Key::Up]),
            back: down(&[Key::S, Key::Down]),
            left: down(&[Key::A, Key::Left]),
            right: down(&[Key::D, Key::Right]),
            up: down(&[Key::E]),
            down: down(&[Key::Q]),
            boost: down(&[Key::LeftShift]),
            mouse_delta: self.track_mouse(mouse_pos, drag),
            drag,
        }
    }

    /// Motion since the previous sample; resets whenever no button is held so
    /// that a new drag never jumps.
    fn track_mouse(&mut self, pos: Option<(f32, f32)>, drag: MouseDrag) -> (f32, f32) {
        if drag == MouseDrag::None {
            self.last_mouse_pos = None;
            return (0.0, 0.0);
        }

        let delta = match (pos, self.last_mouse_pos) {
            (Some((x, y)), Some((last_x, last_y))) => (x - last_x, y - last_y),
            _ => (0.0, 0.0),
        };
        self.last_mouse_pos = pos;
        delta
    }

    /// Commands whose key went down this frame.
    pub fn actions(&self, window: &Window) -> Vec<Action> {
        BINDINGS
            .iter()
            .filter(|(key, _)| window.is_key_pressed(*key, KeyRepeat::No))
            .map(|(_, action)| *action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_combinations_select_drag_mode() {
        assert_eq!(drag_mode(false, false), MouseDrag::None);
        assert_eq!(drag_mode(false, true), MouseDrag::Look);
        assert_eq!(drag_mode(true, false), MouseDrag::Dolly);
        assert_eq!(drag_mode(true, true), MouseDrag::Lift);
    }

    #[test]
    fn mouse_delta_starts_at_zero_and_resets_on_release() {
        let mut input = InputHandler::new();
        assert_eq!(input.track_mouse(Some((10.0, 10.0)), MouseDrag::Look), (0.0, 0.0));
        assert_eq!(input.track_mouse(Some((14.0, 7.0)), MouseDrag::Look), (4.0, -3.0));

        assert_eq!(input.track_mouse(Some((30.0, 30.0)), MouseDrag::None), (0.0, 0.0));
        assert_eq!(input.track_mouse(Some((35.0, 30.0)), MouseDrag::Dolly), (0.0, 0.0));
        assert_eq!(input.track_mouse(Some((36.0, 32.0)), MouseDrag::Dolly), (1.0, 2.0));
    }

    #[test]
    fn every_function_key_is_bound_once() {
        for (i, (key, _)) in BINDINGS.iter().enumerate() {
            assert!(BINDINGS[i + 1..].iter().all(|(other, _)| other != key));
        }
    }
}
