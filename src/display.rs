use ratatui::layout::Rect;

/// Monitor geometry queries the panel model depends on.
///
/// The model never enumerates displays itself; whoever owns the display
/// connection answers these questions.
pub trait DisplayInfo {
    fn monitor_count(&self) -> usize;

    /// True when every monitor has the same height, so a horizontal panel
    /// can stretch across all of them without a ragged edge.
    fn monitors_equal_height(&self) -> bool;

    /// True when every monitor has the same width.
    fn monitors_equal_width(&self) -> bool;
}

/// Static list of monitor rectangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorGeometry {
    monitors: Vec<Rect>,
}

impl MonitorGeometry {
    pub fn new(monitors: Vec<Rect>) -> Self {
        Self { monitors }
    }

    /// A single 1920x1080 monitor at the origin.
    pub fn single() -> Self {
        Self::new(vec![Rect::new(0, 0, 1920, 1080)])
    }

    pub fn monitors(&self) -> &[Rect] {
        &self.monitors
    }

    pub fn monitor(&self, index: usize) -> Option<Rect> {
        self.monitors.get(index).copied()
    }

    /// Parse a `WIDTHxHEIGHT[+X+Y]` description as accepted on the command line.
    pub fn parse_monitor(geometry: &str) -> Option<Rect> {
        let geometry = geometry.trim();
        let (size, origin) = match geometry.split_once('+') {
            Some((size, origin)) => (size, Some(origin)),
            None => (geometry, None),
        };
        let (w, h) = size.split_once(['x', 'X'])?;
        let width = w.parse::<u16>().ok()?;
        let height = h.parse::<u16>().ok()?;
        let (x, y) = match origin {
            Some(origin) => {
                let (x, y) = origin.split_once('+')?;
                (x.parse::<u16>().ok()?, y.parse::<u16>().ok()?)
            }
            None => (0, 0),
        };
        Some(Rect::new(x, y, width, height))
    }
}

impl Default for MonitorGeometry {
    fn default() -> Self {
        Self::single()
    }
}

impl DisplayInfo for MonitorGeometry {
    fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    fn monitors_equal_height(&self) -> bool {
        match self.monitors.split_first() {
            Some((first, rest)) => rest.iter().all(|m| m.height == first.height),
            None => true,
        }
    }

    fn monitors_equal_width(&self) -> bool {
        match self.monitors.split_first() {
            Some((first, rest)) => rest.iter().all(|m| m.width == first.width),
            None => true,
        }
    }
}
