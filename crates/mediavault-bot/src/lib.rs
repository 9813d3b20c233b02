//! Command router for the media vault.
//!
//! Translates transport-delivered commands and upload events into storage
//! calls and formats the outcome as a [`Reply`]. Stateless: every handler
//! validates its arguments, makes exactly one repository call, and keeps
//! success, empty-result, and failure distinguishable.

pub mod command;
pub mod reply;
pub mod router;
pub mod upload;

pub use command::Command;
pub use reply::{format_size, MediaItem, Reply};
pub use router::CommandRouter;
