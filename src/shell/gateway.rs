use crate::model::window::{Monitor, Position, Size};

/// Notification delivered by the window shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Moved(Position),
    Resized(Size),
    /// The user asked to close the window; the shell has not closed it
    CloseRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("window has been closed")]
    Closed,
    #[error("window backend error: {0}")]
    Backend(String),
}

/// The window hosting the list, as seen through the shell's API.
///
/// Geometry is in physical pixels. Notifications are pulled with
/// [`WindowGateway::poll_events`] from the event loop.
pub trait WindowGateway {
    fn outer_position(&self) -> Result<Position, WindowError>;
    fn outer_size(&self) -> Result<Size, WindowError>;
    fn set_position(&mut self, position: Position) -> Result<(), WindowError>;
    fn set_size(&mut self, size: Size) -> Result<(), WindowError>;
    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), WindowError>;
    fn minimize(&mut self) -> Result<(), WindowError>;
    fn unminimize(&mut self) -> Result<(), WindowError>;
    fn show(&mut self) -> Result<(), WindowError>;
    fn hide(&mut self) -> Result<(), WindowError>;
    fn set_focus(&mut self) -> Result<(), WindowError>;
    fn close(&mut self) -> Result<(), WindowError>;
    /// The monitor the window is on, if the shell can tell.
    fn current_monitor(&self) -> Result<Option<Monitor>, WindowError>;
    /// Drain queued notifications, oldest first.
    fn poll_events(&mut self) -> Vec<WindowEvent>;
}
