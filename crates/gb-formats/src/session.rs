//! Session files: a pattern and the kit that plays it, as JSON.

use std::path::Path;

use gb_ir::{Kit, Pattern};
use serde::{Deserialize, Serialize};

use crate::FormatError;

/// A pattern/kit snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub pattern: Pattern,
    pub kit: Kit,
}

/// Parse a session from JSON and check the pattern is playable.
pub fn load_session(json: &str) -> Result<Session, FormatError> {
    let session: Session = serde_json::from_str(json)?;
    session.pattern.validate()?;
    Ok(session)
}

pub fn load_session_file(path: &Path) -> Result<Session, FormatError> {
    let json = std::fs::read_to_string(path)?;
    load_session(&json)
}

/// Serialize a session as pretty-printed JSON.
pub fn save_session(session: &Session) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(session)?)
}
