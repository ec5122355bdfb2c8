use ratatui::prelude::{Direction, Rect};

/// Start coordinate and length of `rect` along `direction`.
pub fn axis_span(direction: Direction, rect: Rect) -> (i32, i32) {
    match direction {
        Direction::Horizontal => (rect.x as i32, rect.width as i32),
        Direction::Vertical => (rect.y as i32, rect.height as i32),
    }
}

/// Midpoint of `rect` along `direction`, rounded down.
pub fn axis_midpoint(direction: Direction, rect: Rect) -> i32 {
    let (start, len) = axis_span(direction, rect);
    start + len / 2
}

/// Pick the coordinate of a pointer position that lies on `direction`.
pub fn project(direction: Direction, x: i32, y: i32) -> i32 {
    match direction {
        Direction::Horizontal => x,
        Direction::Vertical => y,
    }
}

pub fn rect_contains(rect: Rect, column: i32, row: i32) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let min_x = rect.x as i32;
    let min_y = rect.y as i32;
    let max_x = min_x + rect.width as i32;
    let max_y = min_y + rect.height as i32;
    column >= min_x && column < max_x && row >= min_y && row < max_y
}
