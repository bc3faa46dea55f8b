//! Window-backed quit detection.

use macroquad::input::{is_key_pressed, is_quit_requested, KeyCode};
use spikescope_core::{ControlSurface, Directive};

/// Polls the macroquad window for a quit request once per tick.
///
/// A close request on the window or an Escape press both stop playback.
/// Requires `prevent_quit()` to have been called, so the close request
/// reaches the tick loop instead of killing the process mid-frame.
#[derive(Debug, Default)]
pub struct WindowControl;

impl ControlSurface for WindowControl {
    fn poll(&mut self) -> Directive {
        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            Directive::Stop
        } else {
            Directive::Continue
        }
    }
}
