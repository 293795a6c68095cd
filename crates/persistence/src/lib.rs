#![deny(warnings)]

//! Persistence layer: the rules file and the single save slot.
//!
//! Both are plain `key=value` text. A save is written whole on every store
//! and any save that fails to parse or validate is treated as absent.

use std::io;
use std::path::PathBuf;

use sim_core::ValidationError;
use thiserror::Error;

mod rules;
mod save;

pub use rules::{default_rules_path, load_rules};
pub use save::{decode_state, default_save_path, encode_state, FileSlot, MemorySlot, SaveSlot};

/// Errors raised while reading or writing game files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}
