//! Git revision lookup for generated script headers.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::consts::UNKNOWN_REVISION;

/// Length of the abbreviated commit hash.
const SHORT_HASH_LEN: usize = 7;

#[derive(Debug, Error)]
pub enum RevisionError {
  #[error("no git repository found: {0}")]
  Discover(#[source] Box<gix::discover::Error>),

  #[error("failed to resolve HEAD: {0}")]
  Head(#[source] Box<gix::reference::head_id::Error>),
}

/// Abbreviated HEAD commit of the repository containing `dir`.
pub fn head_revision(dir: &Path) -> Result<String, RevisionError> {
  let repo = gix::discover(dir).map_err(|e| RevisionError::Discover(Box::new(e)))?;
  let id = repo.head_id().map_err(|e| RevisionError::Head(Box::new(e)))?;
  let hex = id.to_string();
  Ok(hex.chars().take(SHORT_HASH_LEN).collect())
}

/// Revision text for script headers; never fails.
pub fn describe(dir: &Path) -> String {
  match head_revision(dir) {
    Ok(revision) => revision,
    Err(e) => {
      debug!(dir = %dir.display(), error = %e, "no revision available");
      UNKNOWN_REVISION.to_string()
    }
  }
}
