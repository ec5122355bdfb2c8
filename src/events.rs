use ratatui::layout::Direction;

use crate::panel::PanelId;

/// Change to a single panel, recorded as it happens and drained later by
/// whoever mirrors the model on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelChange {
    PositionChanged,
    OrientationChanged(Direction),
    ItemAdded { index: usize },
    ItemRemoved { index: usize },
    ItemMoved { from: usize, to: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    PanelAdded(PanelId),
    PanelRemoved(PanelId),
    Changed(PanelId, PanelChange),
}
