use crate::model::window::{Corner, Monitor, Position, Size};

/// Top-left position that puts the window's `corner` on the monitor's `corner`.
pub fn snap_position(corner: Corner, monitor: &Monitor, window: Size) -> Position {
    let left = monitor.x;
    let top = monitor.y;
    let right = monitor.x + monitor.width as i32 - window.width as i32;
    let bottom = monitor.y + monitor.height as i32 - window.height as i32;
    match corner {
        Corner::TopLeft => Position { x: left, y: top },
        Corner::TopRight => Position { x: right, y: top },
        Corner::BottomLeft => Position { x: left, y: bottom },
        Corner::BottomRight => Position {
            x: right,
            y: bottom,
        },
    }
}
