//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;

use coursetrack_core::config::{load_config_from, CourseTrackConfig};
use coursetrack_core::parser::parse_catalog;
use coursetrack_core::session::CourseSession;
use coursetrack_core::store::ProgressStore;

use crate::hook::JsonLinesHook;

pub mod certificate;
pub mod init;
pub mod lessons;
pub mod quiz;
pub mod reset;
pub mod status;
pub mod validate;

/// Load config and catalog, and open the learner's session.
pub fn open_session(config_path: Option<PathBuf>) -> Result<CourseSession> {
    let config = load_config_from(config_path.as_deref())?;
    open_session_with(&config)
}

pub fn open_session_with(config: &CourseTrackConfig) -> Result<CourseSession> {
    let catalog = parse_catalog(&config.catalog)?;
    let store = ProgressStore::open_dir(&config.data_dir);
    let mut session = CourseSession::open(catalog, store);

    if let Some(log) = &config.completion_log {
        session = session.with_hook(JsonLinesHook::new(log.clone()));
    }
    if !session.is_persistent() {
        eprintln!(
            "Warning: progress storage at {} is unavailable; changes will not be saved.",
            config.data_dir.display()
        );
    }

    Ok(session)
}
