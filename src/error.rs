//! Contract violations raised by the panel model.
//!
//! These are local and recoverable: callers treat them as no-ops or report
//! them to the user. Configuration I/O failures live in
//! [`crate::config::ConfigError`].

use thiserror::Error;

use crate::panel::PanelId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("invalid screen position: {0}")]
    InvalidPosition(i64),
    #[error("invalid handle style: {0}")]
    InvalidHandleStyle(i64),
    #[error("invalid full width mode: {0}")]
    InvalidFullWidth(i64),
    #[error("item not found")]
    NotFound,
    #[error("index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
    #[error("unknown panel {0:?}")]
    UnknownPanel(PanelId),
    #[error("cannot remove the last panel")]
    LastPanel,
    #[error("item `{0}` is not available")]
    UnavailableItem(String),
}
