//! What the viewer does with each window event.

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::traits::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// Drop the viewer and leave the event loop
    Close,
    /// Resize the target and schedule a repaint
    Resize(Viewport),
    Paint,
    Ignore,
}

/// Map a window event to the action the app takes.
pub fn route(event: &WindowEvent) -> WindowAction {
    match event {
        // The platform may tear the window down without asking first.
        WindowEvent::CloseRequested | WindowEvent::Destroyed => WindowAction::Close,
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
            ..
        } => WindowAction::Close,
        WindowEvent::Resized(size) => WindowAction::Resize(Viewport::new(size.width, size.height)),
        WindowEvent::RedrawRequested => WindowAction::Paint,
        _ => WindowAction::Ignore,
    }
}
