//! Session state kept next to the panel model: which panel the user is
//! working on and which settings dialogs are open. None of it is persisted.

use crate::item::ItemEntry;
use crate::panel::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    PanelManager,
    AddItems,
}

/// Identity of one opened dialog. A dialog that is closed and opened again
/// gets a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogHandle {
    kind: DialogKind,
    serial: u64,
}

impl DialogHandle {
    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Result of asking for a dialog: either a fresh one, or the one already
/// open, brought back to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOpen {
    Opened(DialogHandle),
    Presented(DialogHandle),
}

impl DialogOpen {
    pub fn handle(&self) -> DialogHandle {
        match self {
            DialogOpen::Opened(handle) | DialogOpen::Presented(handle) => *handle,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, DialogOpen::Opened(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialog {
    pub handle: DialogHandle,
    /// Panel the dialog is editing.
    pub target: PanelId,
    /// Item the add-items dialog was opened from; new items go after it.
    pub active_item: Option<ItemEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    current_panel: Option<PanelId>,
    current_panel_dirty: bool,
    panel_manager: Option<OpenDialog>,
    add_items: Option<OpenDialog>,
    next_serial: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_panel(&self) -> Option<PanelId> {
        self.current_panel
    }

    pub fn set_current_panel(&mut self, panel: Option<PanelId>) {
        if self.current_panel == panel {
            return;
        }
        self.current_panel = panel;
        self.current_panel_dirty = true;
    }

    pub fn take_current_panel_change(&mut self) -> Option<Option<PanelId>> {
        if self.current_panel_dirty {
            self.current_panel_dirty = false;
            Some(self.current_panel)
        } else {
            None
        }
    }

    pub fn dialog(&self, kind: DialogKind) -> Option<&OpenDialog> {
        match kind {
            DialogKind::PanelManager => self.panel_manager.as_ref(),
            DialogKind::AddItems => self.add_items.as_ref(),
        }
    }

    pub fn is_open(&self, kind: DialogKind) -> bool {
        self.dialog(kind).is_some()
    }

    /// At most one dialog of each kind exists; asking again presents it.
    pub fn open_dialog(
        &mut self,
        kind: DialogKind,
        target: PanelId,
        active_item: Option<ItemEntry>,
    ) -> DialogOpen {
        if let Some(open) = self.dialog(kind) {
            return DialogOpen::Presented(open.handle);
        }
        self.next_serial += 1;
        let handle = DialogHandle {
            kind,
            serial: self.next_serial,
        };
        *self.slot(kind) = Some(OpenDialog {
            handle,
            target,
            active_item,
        });
        DialogOpen::Opened(handle)
    }

    pub fn close_dialog(&mut self, kind: DialogKind) -> Option<OpenDialog> {
        self.slot(kind).take()
    }

    /// Point an open dialog at another panel. Returns false if it is closed.
    pub fn retarget(&mut self, kind: DialogKind, target: PanelId) -> bool {
        match self.slot(kind) {
            Some(open) => {
                open.target = target;
                open.active_item = None;
                true
            }
            None => false,
        }
    }

    fn slot(&mut self, kind: DialogKind) -> &mut Option<OpenDialog> {
        match kind {
            DialogKind::PanelManager => &mut self.panel_manager,
            DialogKind::AddItems => &mut self.add_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_panel_change_is_taken_once() {
        let mut s = AppState::new();
        assert!(s.take_current_panel_change().is_none());
        s.set_current_panel(Some(PanelId::new(2)));
        // same value -> no extra change
        s.set_current_panel(Some(PanelId::new(2)));
        assert_eq!(s.take_current_panel_change(), Some(Some(PanelId::new(2))));
        assert!(s.take_current_panel_change().is_none());
    }

    #[test]
    fn second_open_presents_existing_dialog() {
        let mut s = AppState::new();
        let first = s.open_dialog(DialogKind::PanelManager, PanelId::new(1), None);
        assert!(first.is_new());
        let again = s.open_dialog(DialogKind::PanelManager, PanelId::new(2), None);
        assert_eq!(again, DialogOpen::Presented(first.handle()));
        assert_eq!(
            s.dialog(DialogKind::PanelManager).map(|d| d.target),
            Some(PanelId::new(1))
        );

        // kinds are independent
        assert!(s.open_dialog(DialogKind::AddItems, PanelId::new(1), None).is_new());
    }

    #[test]
    fn reopening_after_close_gives_new_handle() {
        let mut s = AppState::new();
        let first = s.open_dialog(DialogKind::AddItems, PanelId::new(1), None);
        assert!(s.close_dialog(DialogKind::AddItems).is_some());
        assert!(s.close_dialog(DialogKind::AddItems).is_none());
        let second = s.open_dialog(DialogKind::AddItems, PanelId::new(1), None);
        assert_ne!(first.handle(), second.handle());
        assert_eq!(second.handle().kind(), DialogKind::AddItems);
    }

    #[test]
    fn retarget_requires_open_dialog() {
        let mut s = AppState::new();
        assert!(!s.retarget(DialogKind::PanelManager, PanelId::new(3)));
        s.open_dialog(
            DialogKind::AddItems,
            PanelId::new(1),
            Some(ItemEntry::named("clock")),
        );
        assert!(s.retarget(DialogKind::AddItems, PanelId::new(3)));
        let open = s.dialog(DialogKind::AddItems).unwrap();
        assert_eq!(open.target, PanelId::new(3));
        assert_eq!(open.active_item, None);
    }
}
