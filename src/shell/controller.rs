use std::time::{Duration, Instant};

use crate::io::debounce::Debouncer;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, Reporter};
use crate::io::storage::{Storage, StorageError};
use crate::model::config::{CloseBehavior, WindowConfig};
use crate::model::window::{Corner, Position, Size, WindowGeometry};
use crate::ops::snap::snap_position;

use super::gateway::{WindowError, WindowEvent, WindowGateway};

/// What happened to the window after a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Hidden; the process keeps running
    Hidden,
    /// Closed for real
    Closed,
}

/// Keeps the window's placement in storage and exposes the window actions
/// (pin, minimize, hide, snap).
pub struct WindowController<W: WindowGateway> {
    window: W,
    pinned: bool,
    close_behavior: CloseBehavior,
    pending_save: Debouncer<()>,
    reporter: Reporter,
}

impl<W: WindowGateway> WindowController<W> {
    pub fn new(window: W, config: &WindowConfig, reporter: Reporter) -> Self {
        WindowController {
            window,
            pinned: config.pinned,
            close_behavior: config.close_behavior,
            pending_save: Debouncer::new(Duration::from_millis(config.state_delay_ms)),
            reporter,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn close_behavior(&self) -> CloseBehavior {
        self.close_behavior
    }

    /// When the pending geometry write is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending_save.deadline()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.reporter.take_notice()
    }

    /// Apply the persisted placement (position first, then size) and the
    /// initial always-on-top state. Failures leave the default placement.
    pub fn restore(&mut self, storage: &dyn Storage) {
        match storage.read_window_state() {
            Ok(Some(state)) => {
                let applied = self
                    .window
                    .set_position(state.position())
                    .and_then(|()| self.window.set_size(state.size()));
                if let Err(e) = applied {
                    self.report_window("could not restore window placement", &e);
                }
            }
            Ok(None) => {}
            Err(e) => self.report_storage(RecoveryCategory::Load, &e, None),
        }
        if let Err(e) = self.window.set_always_on_top(self.pinned) {
            self.report_window("could not set always-on-top", &e);
        }
        // restoring is not a user move
        self.window.poll_events();
    }

    /// Drain the window's notifications and perform a due geometry write.
    pub fn pump(&mut self, at: Instant, storage: &dyn Storage) -> Option<CloseOutcome> {
        let mut outcome = None;
        for event in self.window.poll_events() {
            if let Some(o) = self.handle_event(event, at, storage) {
                outcome = Some(o);
            }
        }
        self.tick(at, storage);
        outcome
    }

    pub fn handle_event(
        &mut self,
        event: WindowEvent,
        at: Instant,
        storage: &dyn Storage,
    ) -> Option<CloseOutcome> {
        match event {
            WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
                self.pending_save.schedule((), at);
                None
            }
            WindowEvent::CloseRequested => Some(self.close_requested(storage)),
        }
    }

    /// Write the live geometry once the quiet period has passed.
    pub fn tick(&mut self, at: Instant, storage: &dyn Storage) {
        if self.pending_save.poll(at).is_some() {
            self.save_geometry(storage);
        }
    }

    /// Write a pending geometry change immediately.
    pub fn flush(&mut self, storage: &dyn Storage) {
        if self.pending_save.take().is_some() {
            self.save_geometry(storage);
        }
    }

    /// Flush geometry, then hide or close according to the close policy.
    pub fn close_requested(&mut self, storage: &dyn Storage) -> CloseOutcome {
        self.pending_save.cancel();
        self.save_geometry(storage);
        match self.close_behavior {
            CloseBehavior::Hide => {
                self.hide();
                CloseOutcome::Hidden
            }
            CloseBehavior::Close => {
                if let Err(e) = self.window.close() {
                    self.report_window("could not close window", &e);
                }
                CloseOutcome::Closed
            }
        }
    }

    /// Read the window's current placement and persist it.
    pub fn save_geometry(&mut self, storage: &dyn Storage) {
        let live = self
            .window
            .outer_position()
            .and_then(|p| self.window.outer_size().map(|s| WindowGeometry::new(p, s)));
        let geometry = match live {
            Ok(g) => g,
            Err(e) => {
                self.report_window("could not read window placement", &e);
                return;
            }
        };
        if let Err(e) = storage.write_window_state(&geometry) {
            let body = serde_json::to_string(&geometry).ok();
            self.report_storage(RecoveryCategory::Save, &e, body);
        }
    }

    pub fn toggle_pin(&mut self) -> bool {
        self.pinned = !self.pinned;
        if let Err(e) = self.window.set_always_on_top(self.pinned) {
            self.report_window("could not change always-on-top", &e);
        }
        self.pinned
    }

    pub fn minimize(&mut self) {
        if let Err(e) = self.window.minimize() {
            self.report_window("could not minimize", &e);
        }
    }

    pub fn hide(&mut self) {
        if let Err(e) = self.window.hide() {
            self.report_window("could not hide window", &e);
        }
    }

    /// Bring a hidden or minimized window back and focus it.
    pub fn show(&mut self) {
        let shown = self
            .window
            .show()
            .and_then(|()| self.window.unminimize())
            .and_then(|()| self.window.set_focus());
        if let Err(e) = shown {
            self.report_window("could not show window", &e);
        }
    }

    /// Move the window into a corner of its monitor. Returns the new
    /// position, or `None` when the monitor is unknown.
    pub fn snap(&mut self, corner: Corner) -> Option<Position> {
        let target = self.window.current_monitor().and_then(|monitor| {
            let Some(monitor) = monitor else {
                return Ok(None);
            };
            let size = self.window.outer_size()?;
            Ok(Some(snap_position(corner, &monitor, size)))
        });
        match target {
            Ok(Some(position)) => match self.window.set_position(position) {
                Ok(()) => Some(position),
                Err(e) => {
                    self.report_window("could not snap window", &e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                self.report_window("could not query monitor", &e);
                None
            }
        }
    }

    /// Nudge the window by a pixel offset.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let moved = self.window.outer_position().and_then(|p| {
            self.window.set_position(Position {
                x: p.x.saturating_add(dx),
                y: p.y.saturating_add(dy),
            })
        });
        if let Err(e) = moved {
            self.report_window("could not move window", &e);
        }
    }

    /// Grow or shrink the window, never below 1x1.
    pub fn resize_by(&mut self, dw: i32, dh: i32) {
        let resized = self.window.outer_size().and_then(|s| {
            self.window.set_size(Size {
                width: s.width.saturating_add_signed(dw).max(1),
                height: s.height.saturating_add_signed(dh).max(1),
            })
        });
        if let Err(e) = resized {
            self.report_window("could not resize window", &e);
        }
    }

    fn report_window(&mut self, description: &str, err: &WindowError) {
        self.reporter.report(
            RecoveryEntry::new(RecoveryCategory::Window, description)
                .field("Error", err.to_string()),
        );
    }

    fn report_storage(
        &mut self,
        category: RecoveryCategory,
        err: &StorageError,
        body: Option<String>,
    ) {
        let description = match category {
            RecoveryCategory::Load => "could not load window state",
            _ => "could not save window state",
        };
        let mut entry = RecoveryEntry::new(category, description).field("Error", err.to_string());
        if let Some(body) = body {
            entry = entry.body(body);
        }
        self.reporter.report(entry);
    }
}
