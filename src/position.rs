//! Panel placement model: screen edge, orientation, width mode and the
//! behavior switches persisted per panel.

use std::fmt;

use ratatui::layout::Direction;

use crate::constants::{
    DEFAULT_AUTOHIDE, DEFAULT_SCREEN_POSITION, DEFAULT_SIZE, DEFAULT_TRANSPARENCY,
    MAX_TRANSPARENCY,
};
use crate::display::DisplayInfo;
use crate::error::PanelError;

/// Where a panel sits on its monitor.
///
/// Values 1..=12 are the fixed positions: each screen corner appears twice
/// (once per orientation) and each edge has a centered slot. The numeric
/// values are the persisted encoding and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenPosition {
    None = 0,
    NwH = 1,
    N = 2,
    NeH = 3,
    NeV = 4,
    E = 5,
    SeV = 6,
    SeH = 7,
    S = 8,
    SwH = 9,
    SwV = 10,
    W = 11,
    NwV = 12,
    FloatingH = 13,
    FloatingV = 14,
}

impl ScreenPosition {
    pub const ALL: [ScreenPosition; 15] = [
        ScreenPosition::None,
        ScreenPosition::NwH,
        ScreenPosition::N,
        ScreenPosition::NeH,
        ScreenPosition::NeV,
        ScreenPosition::E,
        ScreenPosition::SeV,
        ScreenPosition::SeH,
        ScreenPosition::S,
        ScreenPosition::SwH,
        ScreenPosition::SwV,
        ScreenPosition::W,
        ScreenPosition::NwV,
        ScreenPosition::FloatingH,
        ScreenPosition::FloatingV,
    ];

    pub fn from_raw(raw: i64) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn raw(self) -> i64 {
        self as i64
    }

    pub fn is_floating(self) -> bool {
        matches!(self, ScreenPosition::FloatingH | ScreenPosition::FloatingV)
    }

    pub fn is_fixed(self) -> bool {
        !self.is_floating() && self != ScreenPosition::None
    }

    /// `None` reads as horizontal, matching how an unplaced panel is laid out.
    pub fn is_horizontal(self) -> bool {
        matches!(
            self,
            ScreenPosition::None
                | ScreenPosition::NwH
                | ScreenPosition::N
                | ScreenPosition::NeH
                | ScreenPosition::SeH
                | ScreenPosition::S
                | ScreenPosition::SwH
                | ScreenPosition::FloatingH
        )
    }

    pub fn orientation(self) -> Direction {
        if self.is_horizontal() {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    }

    pub fn panel_type(self) -> PanelType {
        if self.is_floating() {
            PanelType::Floating
        } else {
            PanelType::Fixed
        }
    }
}

impl fmt::Display for ScreenPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScreenPosition::None => "none",
            ScreenPosition::NwH => "top-left (horizontal)",
            ScreenPosition::N => "top",
            ScreenPosition::NeH => "top-right (horizontal)",
            ScreenPosition::NeV => "top-right (vertical)",
            ScreenPosition::E => "right",
            ScreenPosition::SeV => "bottom-right (vertical)",
            ScreenPosition::SeH => "bottom-right (horizontal)",
            ScreenPosition::S => "bottom",
            ScreenPosition::SwH => "bottom-left (horizontal)",
            ScreenPosition::SwV => "bottom-left (vertical)",
            ScreenPosition::W => "left",
            ScreenPosition::NwV => "top-left (vertical)",
            ScreenPosition::FloatingH => "floating (horizontal)",
            ScreenPosition::FloatingV => "floating (vertical)",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    Fixed,
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FullWidth {
    #[default]
    Normal = 0,
    Full = 1,
    SpanMonitors = 2,
}

impl FullWidth {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(FullWidth::Normal),
            1 => Some(FullWidth::Full),
            2 => Some(FullWidth::SpanMonitors),
            _ => None,
        }
    }

    pub fn raw(self) -> i64 {
        self as i64
    }
}

/// Which ends of a floating panel carry a drag grip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandleStyle {
    #[default]
    None = 0,
    Both = 1,
    Start = 2,
    End = 3,
}

impl HandleStyle {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(HandleStyle::None),
            1 => Some(HandleStyle::Both),
            2 => Some(HandleStyle::Start),
            3 => Some(HandleStyle::End),
            _ => None,
        }
    }

    pub fn raw(self) -> i64 {
        self as i64
    }

    /// User-facing name; the start and end grips depend on orientation.
    pub fn label(self, orientation: Direction) -> &'static str {
        match (self, orientation) {
            (HandleStyle::None, _) => "None",
            (HandleStyle::Both, _) => "At both sides",
            (HandleStyle::Start, Direction::Horizontal) => "Left",
            (HandleStyle::End, Direction::Horizontal) => "Right",
            (HandleStyle::Start, Direction::Vertical) => "Top",
            (HandleStyle::End, Direction::Vertical) => "Bottom",
        }
    }
}

/// Persisted placement and behavior of one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelPosition {
    size: u16,
    monitor: usize,
    screen_position: ScreenPosition,
    full_width: FullWidth,
    x_offset: i32,
    y_offset: i32,
    handle_style: HandleStyle,
    autohide: bool,
    transparency: u8,
}

impl Default for PanelPosition {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            monitor: 0,
            screen_position: DEFAULT_SCREEN_POSITION,
            full_width: FullWidth::Normal,
            x_offset: 0,
            y_offset: 0,
            handle_style: HandleStyle::None,
            autohide: DEFAULT_AUTOHIDE,
            transparency: DEFAULT_TRANSPARENCY,
        }
    }
}

impl PanelPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn monitor(&self) -> usize {
        self.monitor
    }

    pub fn screen_position(&self) -> ScreenPosition {
        self.screen_position
    }

    pub fn full_width(&self) -> FullWidth {
        self.full_width
    }

    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    pub fn handle_style(&self) -> HandleStyle {
        self.handle_style
    }

    pub fn autohide(&self) -> bool {
        self.autohide
    }

    pub fn transparency(&self) -> u8 {
        self.transparency
    }

    pub fn orientation(&self) -> Direction {
        self.screen_position.orientation()
    }

    pub fn panel_type(&self) -> PanelType {
        self.screen_position.panel_type()
    }

    pub fn set_size(&mut self, size: u16) {
        self.size = size.max(1);
    }

    pub fn set_monitor(&mut self, monitor: usize) {
        self.monitor = monitor;
    }

    /// Move the panel. Fixed panels lose their handles, and a span mode the
    /// new position cannot support falls back to full width.
    pub fn set_screen_position(&mut self, position: ScreenPosition, display: &dyn DisplayInfo) {
        self.screen_position = position;
        if !position.is_floating() {
            self.handle_style = HandleStyle::None;
        }
        self.revalidate_span(display);
    }

    pub fn set_screen_position_raw(
        &mut self,
        raw: i64,
        display: &dyn DisplayInfo,
    ) -> Result<(), PanelError> {
        let position = ScreenPosition::from_raw(raw).ok_or(PanelError::InvalidPosition(raw))?;
        self.set_screen_position(position, display);
        Ok(())
    }

    /// Spanning needs a fixed panel and monitors aligned on the axis
    /// perpendicular to the panel.
    pub fn can_span_monitors(&self, display: &dyn DisplayInfo) -> bool {
        if !self.screen_position.is_fixed() {
            return false;
        }
        match self.orientation() {
            Direction::Horizontal => display.monitors_equal_height(),
            Direction::Vertical => display.monitors_equal_width(),
        }
    }

    pub fn set_full_width(&mut self, mode: FullWidth, display: &dyn DisplayInfo) {
        self.full_width = mode;
        self.revalidate_span(display);
    }

    pub fn set_full_width_raw(
        &mut self,
        raw: i64,
        display: &dyn DisplayInfo,
    ) -> Result<(), PanelError> {
        let mode = FullWidth::from_raw(raw).ok_or(PanelError::InvalidFullWidth(raw))?;
        self.set_full_width(mode, display);
        Ok(())
    }

    pub fn set_offsets(&mut self, x: i32, y: i32) {
        self.x_offset = x;
        self.y_offset = y;
    }

    pub fn set_x_offset(&mut self, x: i32) {
        self.x_offset = x;
    }

    pub fn set_y_offset(&mut self, y: i32) {
        self.y_offset = y;
    }

    /// Handles only exist on floating panels; fixed panels keep `None`.
    pub fn set_handle_style(&mut self, style: HandleStyle) {
        self.handle_style = if self.screen_position.is_floating() {
            style
        } else {
            HandleStyle::None
        };
    }

    pub fn set_handle_style_raw(&mut self, raw: i64) -> Result<(), PanelError> {
        let style = HandleStyle::from_raw(raw).ok_or(PanelError::InvalidHandleStyle(raw))?;
        self.set_handle_style(style);
        Ok(())
    }

    pub fn set_autohide(&mut self, autohide: bool) {
        self.autohide = autohide;
    }

    pub fn set_transparency(&mut self, transparency: u8) {
        self.transparency = transparency.min(MAX_TRANSPARENCY);
    }

    /// Switch between fixed and floating placement, keeping the orientation.
    ///
    /// Going floating picks the floating slot of the current orientation and
    /// shows both handles. Going fixed lands on the bottom edge (horizontal)
    /// or the right edge (vertical); the previous fixed corner is not
    /// remembered. Returns whether anything changed.
    pub fn toggle_type(&mut self, kind: PanelType, display: &dyn DisplayInfo) -> bool {
        if self.panel_type() == kind {
            return false;
        }
        let horizontal = self.screen_position.is_horizontal();
        match kind {
            PanelType::Floating => {
                let target = if horizontal {
                    ScreenPosition::FloatingH
                } else {
                    ScreenPosition::FloatingV
                };
                self.set_screen_position(target, display);
                self.handle_style = HandleStyle::Both;
            }
            PanelType::Fixed => {
                let target = if horizontal {
                    ScreenPosition::S
                } else {
                    ScreenPosition::E
                };
                self.set_screen_position(target, display);
                self.handle_style = HandleStyle::None;
            }
        }
        true
    }

    /// Flip a floating panel between horizontal and vertical. Fixed panels
    /// get their orientation from the edge they sit on, so this is a no-op
    /// for them.
    pub fn set_orientation(&mut self, orientation: Direction, display: &dyn DisplayInfo) -> bool {
        if !self.screen_position.is_floating() || self.orientation() == orientation {
            return false;
        }
        let target = match orientation {
            Direction::Horizontal => ScreenPosition::FloatingH,
            Direction::Vertical => ScreenPosition::FloatingV,
        };
        self.set_screen_position(target, display);
        true
    }

    /// Re-derive state that depends on the position and the display.
    pub fn finalize(&mut self, display: &dyn DisplayInfo) {
        if !self.screen_position.is_floating() {
            self.handle_style = HandleStyle::None;
        }
        self.revalidate_span(display);
    }

    fn revalidate_span(&mut self, display: &dyn DisplayInfo) {
        if self.full_width == FullWidth::SpanMonitors && !self.can_span_monitors(display) {
            tracing::debug!(
                position = ?self.screen_position,
                "monitors not aligned for spanning; using full width"
            );
            self.full_width = FullWidth::Full;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MonitorGeometry;
    use ratatui::layout::Rect;

    fn ragged_heights() -> MonitorGeometry {
        MonitorGeometry::new(vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1920, 1200),
        ])
    }

    #[test]
    fn raw_values_round_trip_through_enum() {
        for (idx, pos) in ScreenPosition::ALL.iter().enumerate() {
            assert_eq!(pos.raw(), idx as i64);
            assert_eq!(ScreenPosition::from_raw(idx as i64), Some(*pos));
        }
        assert_eq!(ScreenPosition::from_raw(15), None);
        assert_eq!(ScreenPosition::from_raw(-1), None);
    }

    #[test]
    fn categories_are_exclusive() {
        for pos in ScreenPosition::ALL {
            assert!(!(pos.is_fixed() && pos.is_floating()), "{pos:?}");
        }
        assert!(ScreenPosition::SwV.is_fixed());
        assert!(ScreenPosition::FloatingV.is_floating());
        assert!(!ScreenPosition::None.is_fixed());
        assert!(ScreenPosition::None.is_horizontal());
        assert_eq!(ScreenPosition::E.orientation(), Direction::Vertical);
        assert_eq!(ScreenPosition::N.orientation(), Direction::Horizontal);
    }

    #[test]
    fn invalid_raw_position_leaves_state_untouched() {
        let display = MonitorGeometry::single();
        let mut pos = PanelPosition::new();
        pos.set_screen_position(ScreenPosition::W, &display);
        assert_eq!(
            pos.set_screen_position_raw(42, &display),
            Err(PanelError::InvalidPosition(42))
        );
        assert_eq!(pos.screen_position(), ScreenPosition::W);
    }

    #[test]
    fn span_downgrades_on_unequal_heights() {
        let display = ragged_heights();
        let mut pos = PanelPosition::new();
        pos.set_screen_position(ScreenPosition::S, &display);
        pos.set_full_width(FullWidth::SpanMonitors, &display);
        assert_eq!(pos.full_width(), FullWidth::Full);

        // vertical panels only care about widths
        pos.set_screen_position(ScreenPosition::W, &display);
        pos.set_full_width(FullWidth::SpanMonitors, &display);
        assert_eq!(pos.full_width(), FullWidth::SpanMonitors);

        // moving to a horizontal edge re-checks the precondition
        pos.set_screen_position(ScreenPosition::N, &display);
        assert_eq!(pos.full_width(), FullWidth::Full);
    }

    #[test]
    fn floating_panels_never_span() {
        let display = MonitorGeometry::single();
        let mut pos = PanelPosition::new();
        pos.set_screen_position(ScreenPosition::FloatingH, &display);
        pos.set_full_width(FullWidth::SpanMonitors, &display);
        assert_eq!(pos.full_width(), FullWidth::Full);
    }

    #[test]
    fn toggle_type_maps_orientation() {
        let display = MonitorGeometry::single();
        let mut pos = PanelPosition::new();
        pos.set_screen_position(ScreenPosition::NwV, &display);

        assert!(pos.toggle_type(PanelType::Floating, &display));
        assert_eq!(pos.screen_position(), ScreenPosition::FloatingV);
        assert_eq!(pos.handle_style(), HandleStyle::Both);

        assert!(!pos.toggle_type(PanelType::Floating, &display));

        assert!(pos.toggle_type(PanelType::Fixed, &display));
        assert_eq!(pos.screen_position(), ScreenPosition::E);
        assert_eq!(pos.handle_style(), HandleStyle::None);

        pos.set_screen_position(ScreenPosition::SwH, &display);
        pos.toggle_type(PanelType::Floating, &display);
        pos.toggle_type(PanelType::Fixed, &display);
        assert_eq!(pos.screen_position(), ScreenPosition::S);
    }

    #[test]
    fn handle_style_ignored_on_fixed_panels() {
        let display = MonitorGeometry::single();
        let mut pos = PanelPosition::new();
        pos.set_handle_style(HandleStyle::Start);
        assert_eq!(pos.handle_style(), HandleStyle::None);

        pos.set_screen_position(ScreenPosition::FloatingH, &display);
        pos.set_handle_style(HandleStyle::End);
        assert_eq!(pos.handle_style(), HandleStyle::End);
        assert_eq!(pos.handle_style().label(pos.orientation()), "Right");

        assert!(pos.set_orientation(Direction::Vertical, &display));
        assert_eq!(pos.screen_position(), ScreenPosition::FloatingV);
        assert_eq!(pos.handle_style().label(pos.orientation()), "Bottom");
    }

    #[test]
    fn transparency_and_size_are_clamped() {
        let mut pos = PanelPosition::new();
        pos.set_transparency(250);
        assert_eq!(pos.transparency(), 100);
        pos.set_size(0);
        assert_eq!(pos.size(), 1);
    }
}
