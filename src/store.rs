//! The ordered collection of panels and its load/save cycle.

use std::path::PathBuf;

use crate::config::{
    ConfigError, ConfigParser, ConfigWriter, ParseWarning, ParsedConfig, SourcePolicy,
    read_document,
};
use crate::constants::DEFAULT_ITEM;
use crate::display::DisplayInfo;
use crate::error::PanelError;
use crate::events::PanelEvent;
use crate::item::{ItemFactory, ItemPersistence};
use crate::itembar::ItemOrder;
use crate::panel::{PanelId, PanelRecord};
use crate::position::PanelPosition;

/// What happened while loading.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Document the panels came from; `None` when the default panel was
    /// synthesized instead.
    pub source: Option<PathBuf>,
    pub warnings: Vec<ParseWarning>,
    /// Why the chosen document could not be used, if it could not.
    pub error: Option<ConfigError>,
}

impl LoadReport {
    pub fn used_fallback(&self) -> bool {
        self.source.is_none()
    }
}

#[derive(Debug)]
pub struct PanelStore {
    panels: Vec<PanelRecord>,
    next_id: u32,
    events: Vec<PanelEvent>,
}

impl Default for PanelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelStore {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Load panels from the first existing document named by `policy`.
    ///
    /// Never fails: a missing, unreadable or malformed document, or one
    /// without any panel, yields a single default panel carrying the
    /// default item. Only the first existing candidate is consulted.
    pub fn load(
        policy: &dyn SourcePolicy,
        display: &dyn DisplayInfo,
        factory: &mut dyn ItemFactory,
    ) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let Some(path) = policy.candidates().into_iter().find(|path| path.is_file()) else {
            tracing::debug!("no panel document found; using the default panel");
            return (Self::fallback(factory), report);
        };

        let parsed = read_document(&path)
            .and_then(|document| ConfigParser::new(display, factory).parse(&document));
        match parsed {
            Ok(parsed) => {
                report.warnings = parsed.warnings.clone();
                if parsed.panels.is_empty() {
                    tracing::warn!(path = %path.display(), "document has no panels; using the default panel");
                    return (Self::fallback(factory), report);
                }
                tracing::debug!(path = %path.display(), panels = parsed.panels.len(), "loaded panels");
                report.source = Some(path);
                (Self::from_parsed(parsed), report)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load panels; using the default panel");
                report.error = Some(err);
                (Self::fallback(factory), report)
            }
        }
    }

    /// Build a store straight from document text. Unlike [`Self::load`]
    /// this reports a malformed document instead of falling back.
    pub fn from_document(
        document: &str,
        display: &dyn DisplayInfo,
        factory: &mut dyn ItemFactory,
    ) -> Result<(Self, Vec<ParseWarning>), ConfigError> {
        let mut parsed = ConfigParser::new(display, factory).parse(document)?;
        let warnings = std::mem::take(&mut parsed.warnings);
        Ok((Self::from_parsed(parsed), warnings))
    }

    fn from_parsed(parsed: ParsedConfig) -> Self {
        let next_id = parsed
            .panels
            .iter()
            .map(|panel| panel.id().raw())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self {
            panels: parsed.panels,
            next_id,
            events: Vec::new(),
        }
    }

    /// One panel with default placement and the default item. When the
    /// factory refuses the default item the panel starts out empty, and a
    /// warning is logged.
    pub fn fallback(factory: &mut dyn ItemFactory) -> Self {
        let mut store = Self::new();
        let panel = store.default_panel(factory);
        store.panels.push(panel);
        store
    }

    fn default_panel(&mut self, factory: &mut dyn ItemFactory) -> PanelRecord {
        let position = PanelPosition::default();
        let mut items = ItemOrder::new(position.orientation());
        match factory.new_item(DEFAULT_ITEM) {
            Some(item) => {
                items.append(item);
            }
            None => tracing::warn!(item = DEFAULT_ITEM, "default item unavailable"),
        }
        PanelRecord::from_parts(self.allocate_id(), position, items)
    }

    /// Write all panels to the policy's save location, then let every item
    /// store its own settings. Items are saved even when the document could
    /// not be written. Returns where the document went, or `None` when
    /// saving is disabled.
    pub fn save(
        &self,
        policy: &dyn SourcePolicy,
        persistence: &mut dyn ItemPersistence,
    ) -> Result<Option<PathBuf>, ConfigError> {
        let Some(dest) = policy.save_location() else {
            tracing::debug!("panel customization is locked; not saving");
            return Ok(None);
        };
        let written = ConfigWriter::write(&self.panels, &dest);
        for panel in &self.panels {
            for item in panel.items().iter() {
                persistence.save_item(panel.id(), item);
            }
        }
        written.map(|()| Some(dest))
    }

    pub fn render(&self) -> String {
        ConfigWriter::render(&self.panels)
    }

    /// Append an empty panel with default placement.
    pub fn add_panel(&mut self) -> PanelId {
        let id = self.allocate_id();
        self.panels.push(PanelRecord::new(id));
        self.events.push(PanelEvent::PanelAdded(id));
        tracing::debug!(panel = ?id, "added panel");
        id
    }

    /// Remove a panel. The last remaining panel cannot be removed.
    pub fn remove_panel(&mut self, id: PanelId) -> Result<PanelRecord, PanelError> {
        let index = self.position_of(id).ok_or(PanelError::UnknownPanel(id))?;
        if self.panels.len() == 1 {
            return Err(PanelError::LastPanel);
        }
        let panel = self.panels.remove(index);
        self.events.push(PanelEvent::PanelRemoved(id));
        tracing::debug!(panel = ?id, "removed panel");
        Ok(panel)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelRecord> {
        self.panels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PanelRecord> {
        self.panels.iter_mut()
    }

    pub fn ids(&self) -> Vec<PanelId> {
        self.panels.iter().map(PanelRecord::id).collect()
    }

    pub fn get(&self, id: PanelId) -> Option<&PanelRecord> {
        self.panels.iter().find(|panel| panel.id() == id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut PanelRecord> {
        self.panels.iter_mut().find(|panel| panel.id() == id)
    }

    pub fn nth(&self, index: usize) -> Option<&PanelRecord> {
        self.panels.get(index)
    }

    pub fn position_of(&self, id: PanelId) -> Option<usize> {
        self.panels.iter().position(|panel| panel.id() == id)
    }

    /// User-facing name: "Panel N", numbered by current position.
    pub fn label(&self, id: PanelId) -> Option<String> {
        self.position_of(id)
            .map(|index| format!("Panel {}", index + 1))
    }

    /// Drain everything that changed since the last call: structural
    /// events first, then per-panel changes in panel order.
    pub fn take_events(&mut self) -> Vec<PanelEvent> {
        let mut events = std::mem::take(&mut self.events);
        for panel in &mut self.panels {
            let id = panel.id();
            events.extend(
                panel
                    .take_changes()
                    .into_iter()
                    .map(|change| PanelEvent::Changed(id, change)),
            );
        }
        events
    }

    /// Same panels with the same placement and items, in the same order.
    pub fn same_config(&self, other: &PanelStore) -> bool {
        self.panels.len() == other.panels.len()
            && self
                .panels
                .iter()
                .zip(&other.panels)
                .all(|(a, b)| a.same_config(b))
    }

    fn allocate_id(&mut self) -> PanelId {
        let id = PanelId::new(self.next_id);
        self.next_id = id.raw().saturating_add(1);
        id
    }
}
