//! Where panel documents are read from and saved to.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, SYSTEM_CONFIG_ROOT};

pub trait SourcePolicy {
    /// Documents to try, most preferred first.
    fn candidates(&self) -> Vec<PathBuf>;

    /// Where saves go. `None` when the user may not change the panels.
    fn save_location(&self) -> Option<PathBuf>;
}

/// Standard lookup: the user's config directory first, then each system
/// config root.
///
/// In kiosk mode the user file is ignored and nothing is ever saved, so
/// every session starts from the system-wide document.
#[derive(Debug, Clone)]
pub struct XdgSources {
    user_root: Option<PathBuf>,
    system_roots: Vec<PathBuf>,
    kiosk: bool,
}

impl Default for XdgSources {
    fn default() -> Self {
        Self::new()
    }
}

impl XdgSources {
    pub fn new() -> Self {
        let system_roots = env::var_os("XDG_CONFIG_DIRS")
            .map(|roots| env::split_paths(&roots).collect::<Vec<_>>())
            .filter(|roots| !roots.is_empty())
            .unwrap_or_else(|| vec![PathBuf::from(SYSTEM_CONFIG_ROOT)]);
        Self::with_roots(dirs::config_dir(), system_roots)
    }

    pub fn with_roots(user_root: Option<PathBuf>, system_roots: Vec<PathBuf>) -> Self {
        Self {
            user_root,
            system_roots,
            kiosk: false,
        }
    }

    pub fn kiosk(mut self, kiosk: bool) -> Self {
        self.kiosk = kiosk;
        self
    }

    pub fn is_kiosk(&self) -> bool {
        self.kiosk
    }

    fn user_file(&self) -> Option<PathBuf> {
        self.user_root.as_deref().map(document_in)
    }
}

impl SourcePolicy for XdgSources {
    fn candidates(&self) -> Vec<PathBuf> {
        let user = if self.kiosk { None } else { self.user_file() };
        user.into_iter()
            .chain(self.system_roots.iter().map(|root| document_in(root)))
            .collect()
    }

    fn save_location(&self) -> Option<PathBuf> {
        if self.kiosk {
            return None;
        }
        self.user_file()
    }
}

fn document_in(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// A single explicit document, read and saved in place.
#[derive(Debug, Clone)]
pub struct FixedSource {
    path: PathBuf,
    read_only: bool,
}

impl FixedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourcePolicy for FixedSource {
    fn candidates(&self) -> Vec<PathBuf> {
        vec![self.path.clone()]
    }

    fn save_location(&self) -> Option<PathBuf> {
        (!self.read_only).then(|| self.path.clone())
    }
}
