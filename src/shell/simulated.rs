use std::collections::VecDeque;

use crate::model::window::{Monitor, Position, Size, WindowGeometry};

use super::gateway::{WindowError, WindowEvent, WindowGateway};

/// In-process window model: geometry, visibility and a fixed monitor layout.
///
/// Geometry changes queue `Moved`/`Resized` notifications the way a real
/// shell reports them; `request_close` queues a `CloseRequested`.
#[derive(Debug, Clone)]
pub struct SimulatedWindow {
    geometry: WindowGeometry,
    monitors: Vec<Monitor>,
    always_on_top: bool,
    minimized: bool,
    visible: bool,
    focused: bool,
    closed: bool,
    events: VecDeque<WindowEvent>,
}

impl SimulatedWindow {
    pub fn new(geometry: WindowGeometry, monitors: Vec<Monitor>) -> Self {
        SimulatedWindow {
            geometry,
            monitors,
            always_on_top: false,
            minimized: false,
            visible: true,
            focused: true,
            closed: false,
            events: VecDeque::new(),
        }
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn is_always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Press the window's close button.
    pub fn request_close(&mut self) {
        if !self.closed {
            self.events.push_back(WindowEvent::CloseRequested);
        }
    }

    fn check_open(&self) -> Result<(), WindowError> {
        if self.closed {
            Err(WindowError::Closed)
        } else {
            Ok(())
        }
    }
}

impl WindowGateway for SimulatedWindow {
    fn outer_position(&self) -> Result<Position, WindowError> {
        self.check_open()?;
        Ok(self.geometry.position())
    }

    fn outer_size(&self) -> Result<Size, WindowError> {
        self.check_open()?;
        Ok(self.geometry.size())
    }

    fn set_position(&mut self, position: Position) -> Result<(), WindowError> {
        self.check_open()?;
        if self.geometry.position() != position {
            self.geometry.x = position.x;
            self.geometry.y = position.y;
            self.events.push_back(WindowEvent::Moved(position));
        }
        Ok(())
    }

    fn set_size(&mut self, size: Size) -> Result<(), WindowError> {
        self.check_open()?;
        if size.width == 0 || size.height == 0 {
            return Err(WindowError::Backend(format!(
                "invalid size {}x{}",
                size.width, size.height
            )));
        }
        if self.geometry.size() != size {
            self.geometry.width = size.width;
            self.geometry.height = size.height;
            self.events.push_back(WindowEvent::Resized(size));
        }
        Ok(())
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), WindowError> {
        self.check_open()?;
        self.always_on_top = on_top;
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), WindowError> {
        self.check_open()?;
        self.minimized = true;
        self.focused = false;
        Ok(())
    }

    fn unminimize(&mut self) -> Result<(), WindowError> {
        self.check_open()?;
        self.minimized = false;
        Ok(())
    }

    fn show(&mut self) -> Result<(), WindowError> {
        self.check_open()?;
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> Result<(), WindowError> {
        self.check_open()?;
        self.visible = false;
        self.focused = false;
        Ok(())
    }

    fn set_focus(&mut self) -> Result<(), WindowError> {
        self.check_open()?;
        self.focused = self.visible && !self.minimized;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WindowError> {
        self.check_open()?;
        self.closed = true;
        self.visible = false;
        self.focused = false;
        self.events.clear();
        Ok(())
    }

    fn current_monitor(&self) -> Result<Option<Monitor>, WindowError> {
        self.check_open()?;
        let cx = self.geometry.x as i64 + self.geometry.width as i64 / 2;
        let cy = self.geometry.y as i64 + self.geometry.height as i64 / 2;
        Ok(self.monitors.iter().copied().find(|m| m.contains(cx, cy)))
    }

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.events.drain(..).collect()
    }
}
