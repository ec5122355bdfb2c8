//! Shared crate-wide constants.

use crate::position::ScreenPosition;

/// Panel thickness in pixels used when a document does not specify one.
pub const DEFAULT_SIZE: u16 = 30;

/// Screen position of a freshly created panel: centered on the bottom edge.
pub const DEFAULT_SCREEN_POSITION: ScreenPosition = ScreenPosition::S;

pub const DEFAULT_AUTOHIDE: bool = false;

/// Transparency percentage (0 is opaque, 100 fully transparent).
pub const DEFAULT_TRANSPARENCY: u8 = 20;

/// Upper bound accepted for the `transparency` property.
pub const MAX_TRANSPARENCY: u8 = 100;

/// Item placed on the single panel synthesized when no configuration could
/// be loaded.
pub const DEFAULT_ITEM: &str = "launcher";

/// Application directory below the XDG config roots.
pub const CONFIG_DIR_NAME: &str = "panel-manager";

/// Name of the panel configuration document inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "panels.xml";

/// System-wide XDG config root consulted after the user's own directory.
pub const SYSTEM_CONFIG_ROOT: &str = "/etc/xdg";
