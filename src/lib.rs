//! Panel layout, item ordering and configuration persistence for a desktop
//! panel.
//!
//! [`store::PanelStore`] owns the panels. Each [`panel::PanelRecord`] pairs
//! a [`position::PanelPosition`] with an [`itembar::ItemOrder`] of items.
//! The [`config`] module reads and writes the XML document the panels are
//! kept in, and [`app::PanelApp`] adds the dialog rules on top.

pub mod app;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod events;
pub mod item;
pub mod itembar;
pub mod layout;
pub mod panel;
pub mod position;
pub mod state;
pub mod store;
pub mod tracing_sub;

pub use app::PanelApp;
pub use config::{ConfigError, ParseWarning};
pub use display::{DisplayInfo, MonitorGeometry};
pub use error::PanelError;
pub use events::{PanelChange, PanelEvent};
pub use item::{DefaultItemFactory, ItemEntry, ItemFactory, ItemPersistence};
pub use itembar::ItemOrder;
pub use panel::{PanelId, PanelRecord};
pub use position::{FullWidth, HandleStyle, PanelPosition, PanelType, ScreenPosition};
pub use store::PanelStore;
