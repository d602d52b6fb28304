//! Runtime storage backend selection

use crate::domain::DomainError;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }

    /// Parse a configured backend name, rejecting unknown names
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Self::from_str(s).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}', expected 'postgres' or 'memory'",
                s
            ))
        })
    }
}
