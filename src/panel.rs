use ratatui::layout::Rect;

use crate::error::PanelError;
use crate::events::PanelChange;
use crate::item::ItemEntry;
use crate::itembar::ItemOrder;
use crate::position::PanelPosition;

/// Stable identity of a panel. Positions in the store shift when panels are
/// removed; ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(u32);

impl PanelId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One panel: its persisted placement, its items, and runtime-only state
/// that is never written to disk.
#[derive(Debug, Clone)]
pub struct PanelRecord {
    id: PanelId,
    position: PanelPosition,
    items: ItemOrder<ItemEntry>,
    autohide_blocks: u32,
    edit_mode: bool,
    changes: Vec<PanelChange>,
}

impl PanelRecord {
    pub fn new(id: PanelId) -> Self {
        Self::with_position(id, PanelPosition::default())
    }

    pub fn with_position(id: PanelId, position: PanelPosition) -> Self {
        Self {
            id,
            items: ItemOrder::new(position.orientation()),
            position,
            autohide_blocks: 0,
            edit_mode: false,
            changes: Vec::new(),
        }
    }

    /// Assemble a record from parsed parts; the bar takes the panel's
    /// orientation and no change is recorded.
    pub(crate) fn from_parts(
        id: PanelId,
        position: PanelPosition,
        mut items: ItemOrder<ItemEntry>,
    ) -> Self {
        items.set_orientation(position.orientation());
        Self {
            id,
            position,
            items,
            autohide_blocks: 0,
            edit_mode: false,
            changes: Vec::new(),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn position(&self) -> &PanelPosition {
        &self.position
    }

    pub fn items(&self) -> &ItemOrder<ItemEntry> {
        &self.items
    }

    /// Mutate the placement through `edit`. A change is recorded only when
    /// the position actually differs afterwards, and the item bar follows
    /// any orientation switch.
    pub fn edit_position<R>(&mut self, edit: impl FnOnce(&mut PanelPosition) -> R) -> R {
        let before = self.position.clone();
        let out = edit(&mut self.position);
        if self.position != before {
            self.changes.push(PanelChange::PositionChanged);
            let orientation = self.position.orientation();
            if orientation != before.orientation() {
                self.items.set_orientation(orientation);
                self.changes.push(PanelChange::OrientationChanged(orientation));
            }
        }
        out
    }

    pub fn insert_item(&mut self, item: ItemEntry, position: i32) -> usize {
        let index = self.items.insert(item, position);
        self.changes.push(PanelChange::ItemAdded { index });
        index
    }

    pub fn append_item(&mut self, item: ItemEntry) -> usize {
        self.insert_item(item, -1)
    }

    pub fn prepend_item(&mut self, item: ItemEntry) -> usize {
        self.insert_item(item, 0)
    }

    pub fn reorder_item(&mut self, item: &ItemEntry, position: i32) -> Result<usize, PanelError> {
        let (from, to) = self.items.reorder(item, position)?;
        if from != to {
            self.changes.push(PanelChange::ItemMoved { from, to });
        }
        Ok(to)
    }

    pub fn remove_item(&mut self, item: &ItemEntry) -> Result<usize, PanelError> {
        let index = self.items.remove(item)?;
        self.changes.push(PanelChange::ItemRemoved { index });
        Ok(index)
    }

    /// Report where the UI placed each item, in display order.
    pub fn layout_items(&mut self, rects: &[Rect]) {
        self.items.set_allocations(rects);
    }

    pub fn drop_index(&self, x: i32, y: i32) -> usize {
        self.items.drop_index(x, y)
    }

    /// Keep the panel visible while a settings dialog is open. Calls nest.
    pub fn block_autohide(&mut self) {
        self.autohide_blocks = self.autohide_blocks.saturating_add(1);
    }

    pub fn unblock_autohide(&mut self) {
        self.autohide_blocks = self.autohide_blocks.saturating_sub(1);
    }

    /// Whether the panel should currently hide itself.
    pub fn autohide_active(&self) -> bool {
        self.position.autohide() && self.autohide_blocks == 0
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    /// Same placement and same items in the same order; identity and
    /// runtime state are ignored.
    pub fn same_config(&self, other: &PanelRecord) -> bool {
        self.position == other.position && self.items == other.items
    }

    pub(crate) fn take_changes(&mut self) -> Vec<PanelChange> {
        std::mem::take(&mut self.changes)
    }
}
