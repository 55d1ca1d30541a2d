//! Identifier types shared across the executor.

use serde::{Deserialize, Serialize};

/// Unique identifier for one `execute` call.
///
/// Every log line emitted during a run carries its `RunId`, so interleaved
/// runs against the same subscriber can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Creates a new random run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a run ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_run_id_roundtrip() {
        let id = RunId::new();
        let uuid = *id.as_uuid();
        assert_eq!(RunId::from_uuid(uuid), id);
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }
}
