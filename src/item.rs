//! Item identities and the collaborators that create and persist items.

use std::collections::BTreeSet;
use std::fmt;

use crate::panel::PanelId;

/// One docked item: the plugin it instantiates plus an optional instance id
/// that tells several instances of the same plugin apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemEntry {
    pub name: String,
    pub id: Option<String>,
}

impl ItemEntry {
    pub fn new(name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(name, Some(id.into()))
    }
}

impl fmt::Display for ItemEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} ({})", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Builds runtime items from their persisted identity.
pub trait ItemFactory {
    fn is_available(&self, name: &str) -> bool;

    /// Recreate a persisted item exactly as it was stored. Returns `None`
    /// when no such plugin exists.
    fn create_item(&mut self, name: &str, id: Option<&str>) -> Option<ItemEntry>;

    /// Create a fresh instance of `name` with a new instance id.
    fn new_item(&mut self, name: &str) -> Option<ItemEntry>;
}

/// Lets every live item write its own settings when the panels are saved.
pub trait ItemPersistence {
    fn save_item(&mut self, panel: PanelId, item: &ItemEntry);
}

/// Items that keep no settings of their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoItemPersistence;

impl ItemPersistence for NoItemPersistence {
    fn save_item(&mut self, _panel: PanelId, _item: &ItemEntry) {}
}

/// Factory that accepts any plugin name (or only an allow-list) and gives
/// new items numeric instance ids.
#[derive(Debug, Clone)]
pub struct DefaultItemFactory {
    allowed: Option<BTreeSet<String>>,
    next_id: u64,
}

impl Default for DefaultItemFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultItemFactory {
    pub fn new() -> Self {
        Self {
            allowed: None,
            next_id: 1,
        }
    }

    pub fn with_allowed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Some(names.into_iter().map(Into::into).collect()),
            next_id: 1,
        }
    }

    /// Keep generated ids clear of numeric ids read from disk.
    fn reserve_id(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.next_id = self.next_id.max(n.saturating_add(1));
        }
    }

    fn fresh_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id.to_string()
    }
}

impl ItemFactory for DefaultItemFactory {
    fn is_available(&self, name: &str) -> bool {
        !name.is_empty()
            && self
                .allowed
                .as_ref()
                .is_none_or(|allowed| allowed.contains(name))
    }

    fn create_item(&mut self, name: &str, id: Option<&str>) -> Option<ItemEntry> {
        if !self.is_available(name) {
            return None;
        }
        if let Some(id) = id {
            self.reserve_id(id);
        }
        Some(ItemEntry::new(name, id.map(str::to_string)))
    }

    fn new_item(&mut self, name: &str) -> Option<ItemEntry> {
        if !self.is_available(name) {
            return None;
        }
        let id = self.fresh_id();
        Some(ItemEntry::with_id(name, id))
    }
}
