use crate::db::statement::{KeyType, Param};
use crate::error::{Result, RosterError};
use std::fmt;

/// Player reference as received from the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RosterError::BadRequest("player reference is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bound form of this reference for a key column of type `key_type`.
    pub fn param(&self, key_type: KeyType) -> Param {
        Param::key(&self.0, key_type)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
