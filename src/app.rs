//! Application controller tying the panel store to its collaborators and to
//! the settings dialogs.

use std::path::PathBuf;

use crate::config::{ConfigError, SourcePolicy};
use crate::display::DisplayInfo;
use crate::error::PanelError;
use crate::events::PanelEvent;
use crate::item::{DefaultItemFactory, ItemEntry, ItemFactory, ItemPersistence, NoItemPersistence};
use crate::panel::{PanelId, PanelRecord};
use crate::position::PanelPosition;
use crate::state::{AppState, DialogKind, DialogOpen};
use crate::store::{LoadReport, PanelStore};

pub struct PanelApp {
    store: PanelStore,
    state: AppState,
    policy: Box<dyn SourcePolicy>,
    display: Box<dyn DisplayInfo>,
    factory: Box<dyn ItemFactory>,
    persistence: Box<dyn ItemPersistence>,
}

impl PanelApp {
    /// An app with no panels yet; call [`PanelApp::load`] next.
    pub fn new(policy: Box<dyn SourcePolicy>, display: Box<dyn DisplayInfo>) -> Self {
        Self {
            store: PanelStore::new(),
            state: AppState::new(),
            policy,
            display,
            factory: Box::new(DefaultItemFactory::new()),
            persistence: Box::new(NoItemPersistence),
        }
    }

    pub fn with_factory(mut self, factory: Box<dyn ItemFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_persistence(mut self, persistence: Box<dyn ItemPersistence>) -> Self {
        self.persistence = persistence;
        self
    }

    /// Replace all panels with the configured document (or the default
    /// panel). Open dialogs are closed without saving.
    pub fn load(&mut self) -> LoadReport {
        let (store, report) = PanelStore::load(
            self.policy.as_ref(),
            self.display.as_ref(),
            self.factory.as_mut(),
        );
        self.store = store;
        self.state.close_dialog(DialogKind::PanelManager);
        self.state.close_dialog(DialogKind::AddItems);
        self.state.set_current_panel(self.store.ids().first().copied());
        report
    }

    pub fn save(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        self.store
            .save(self.policy.as_ref(), self.persistence.as_mut())
    }

    pub fn store(&self) -> &PanelStore {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn display(&self) -> &dyn DisplayInfo {
        self.display.as_ref()
    }

    pub fn panel(&self, id: PanelId) -> Result<&PanelRecord, PanelError> {
        self.store.get(id).ok_or(PanelError::UnknownPanel(id))
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Result<&mut PanelRecord, PanelError> {
        self.store.get_mut(id).ok_or(PanelError::UnknownPanel(id))
    }

    /// Panel the user is working on; the first panel when none was picked.
    pub fn current_panel(&self) -> Option<PanelId> {
        self.state
            .current_panel()
            .filter(|id| self.store.get(*id).is_some())
            .or_else(|| self.store.ids().first().copied())
    }

    pub fn set_current_panel(&mut self, id: PanelId) -> Result<(), PanelError> {
        self.panel(id)?;
        self.state.set_current_panel(Some(id));
        Ok(())
    }

    /// Edit a panel's placement with access to the monitor layout.
    pub fn edit_position<R>(
        &mut self,
        id: PanelId,
        edit: impl FnOnce(&mut PanelPosition, &dyn DisplayInfo) -> R,
    ) -> Result<R, PanelError> {
        let display = self.display.as_ref();
        let panel = self
            .store
            .get_mut(id)
            .ok_or(PanelError::UnknownPanel(id))?;
        Ok(panel.edit_position(|position| edit(position, display)))
    }

    pub fn open_dialog(&mut self, kind: DialogKind) -> Result<DialogOpen, PanelError> {
        self.open_dialog_with(kind, None)
    }

    /// Open the add-items dialog from `active`, so that new items land
    /// right after it.
    pub fn open_add_items(&mut self, active: Option<ItemEntry>) -> Result<DialogOpen, PanelError> {
        self.open_dialog_with(DialogKind::AddItems, active)
    }

    fn open_dialog_with(
        &mut self,
        kind: DialogKind,
        active: Option<ItemEntry>,
    ) -> Result<DialogOpen, PanelError> {
        let target = self.current_panel().ok_or(PanelError::NotFound)?;
        let opened = self.state.open_dialog(kind, target, active);
        if !opened.is_new() {
            return Ok(opened);
        }
        for panel in self.store.iter_mut() {
            panel.block_autohide();
            if kind == DialogKind::AddItems {
                panel.set_edit_mode(true);
            }
        }
        tracing::debug!(?kind, panel = ?target, "opened dialog");
        Ok(opened)
    }

    /// Close a dialog, undo what opening it did and save. Closing a dialog
    /// that is not open does nothing.
    pub fn close_dialog(&mut self, kind: DialogKind) -> Result<Option<PathBuf>, ConfigError> {
        if self.state.close_dialog(kind).is_none() {
            return Ok(None);
        }
        for panel in self.store.iter_mut() {
            panel.unblock_autohide();
            if kind == DialogKind::AddItems {
                panel.set_edit_mode(false);
            }
        }
        tracing::debug!(?kind, "closed dialog");
        self.save()
    }

    /// Add a panel and make it current. The new panel picks up what every
    /// open dialog did to the others, and the panel manager switches to it.
    pub fn add_panel(&mut self) -> PanelId {
        let id = self.store.add_panel();
        self.state.retarget(DialogKind::PanelManager, id);
        let adding_items = self.state.is_open(DialogKind::AddItems);
        let open_dialogs = [DialogKind::PanelManager, DialogKind::AddItems]
            .into_iter()
            .filter(|kind| self.state.is_open(*kind))
            .count();
        if let Some(panel) = self.store.get_mut(id) {
            for _ in 0..open_dialogs {
                panel.block_autohide();
            }
            panel.set_edit_mode(adding_items);
        }
        self.state.set_current_panel(Some(id));
        id
    }

    /// Remove a panel. Dialogs looking at it move to the first panel, except
    /// the add-items dialog, which closes.
    pub fn remove_panel(&mut self, id: PanelId) -> Result<PanelRecord, PanelError> {
        let removed = self.store.remove_panel(id)?;
        let first = self.store.ids().first().copied();

        if self
            .state
            .dialog(DialogKind::AddItems)
            .is_some_and(|open| open.target == id)
            && let Err(err) = self.close_dialog(DialogKind::AddItems)
        {
            tracing::warn!(error = %err, "failed to save after closing the add-items dialog");
        }
        if let Some(first) = first {
            self.state.retarget(DialogKind::PanelManager, first);
            if self.state.current_panel() == Some(id) {
                self.state.set_current_panel(Some(first));
            }
        }
        Ok(removed)
    }

    /// Create a new `name` item on the panel being edited. It goes right
    /// after the add-items dialog's active item when there is one, and at
    /// the end otherwise. Returns the panel and the index it landed on.
    pub fn add_item(&mut self, name: &str) -> Result<(PanelId, usize), PanelError> {
        let (target, active) = match self.state.dialog(DialogKind::AddItems) {
            Some(open) => (open.target, open.active_item.clone()),
            None => (self.current_panel().ok_or(PanelError::NotFound)?, None),
        };
        if !self.factory.is_available(name) {
            return Err(PanelError::UnavailableItem(name.to_string()));
        }
        let panel = self
            .store
            .get_mut(target)
            .ok_or(PanelError::UnknownPanel(target))?;
        let item = self
            .factory
            .new_item(name)
            .ok_or_else(|| PanelError::UnavailableItem(name.to_string()))?;

        let after = active.and_then(|active| panel.items().index_of(&active));
        let index = match after {
            Some(n) => panel.insert_item(item, (n + 1) as i32),
            None => panel.append_item(item),
        };
        tracing::debug!(panel = ?target, item = name, index, "added item");
        Ok((target, index))
    }

    pub fn label(&self, id: PanelId) -> Option<String> {
        self.store.label(id)
    }

    pub fn take_events(&mut self) -> Vec<PanelEvent> {
        self.store.take_events()
    }
}
