//! Reading and writing the panel configuration document.
//!
//! The document is a small XML dialect:
//!
//! ```xml
//! <panels>
//!   <panel>
//!     <properties>
//!       <property name="size" value="30"/>
//!     </properties>
//!     <items>
//!       <item name="launcher" id="1"/>
//!     </items>
//!   </panel>
//! </panels>
//! ```
//!
//! Reading is forgiving: unknown elements and incomplete entries are
//! reported as [`ParseWarning`]s and skipped. Only a document that is not
//! well-formed fails as a whole.

pub mod parser;
pub mod sources;
pub mod writer;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use parser::{ConfigParser, ParsedConfig};
pub use sources::{FixedSource, SourcePolicy, XdgSources};
pub use writer::ConfigWriter;

/// Read a whole configuration document into memory.
pub fn read_document(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed document at byte {position}: {message}")]
    Parse { position: usize, message: String },
}

/// Recoverable problem found while reading a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("unknown element <{element}>")]
    UnknownElement { element: String },
    #[error("unexpected end of element </{element}>")]
    UnexpectedEnd { element: String },
    #[error("<{element}> has no `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("unknown property `{name}`")]
    UnknownProperty { name: String },
    #[error("invalid value `{value}` for property `{name}`")]
    InvalidValue { name: String, value: String },
    #[error("item `{name}` is not available")]
    UnavailableItem { name: String },
}
