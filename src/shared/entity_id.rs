use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ID must be a valid UUID")]
pub struct InvalidUuidError;

/// Entity identifier. Always a valid UUID, generated (v4) when not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueEntityId(Uuid);

impl UniqueEntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, InvalidUuidError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| InvalidUuidError)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UniqueEntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UniqueEntityId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UniqueEntityId {
    type Err = InvalidUuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UniqueEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier argument accepted by repository lookups: either a raw string
/// (validated lazily, so a malformed value simply matches nothing) or an
/// already-parsed [`UniqueEntityId`].
#[derive(Debug, Clone, Copy)]
pub enum EntityIdRef<'a> {
    Raw(&'a str),
    Id(UniqueEntityId),
}

impl EntityIdRef<'_> {
    /// Parsed form, `None` when the raw value is not a UUID
    pub fn resolve(&self) -> Option<UniqueEntityId> {
        match self {
            EntityIdRef::Raw(raw) => UniqueEntityId::parse(raw).ok(),
            EntityIdRef::Id(id) => Some(*id),
        }
    }
}

impl fmt::Display for EntityIdRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityIdRef::Raw(raw) => f.write_str(raw),
            EntityIdRef::Id(id) => id.fmt(f),
        }
    }
}

impl<'a> From<&'a str> for EntityIdRef<'a> {
    fn from(value: &'a str) -> Self {
        EntityIdRef::Raw(value)
    }
}

impl<'a> From<&'a String> for EntityIdRef<'a> {
    fn from(value: &'a String) -> Self {
        EntityIdRef::Raw(value.as_str())
    }
}

impl From<UniqueEntityId> for EntityIdRef<'_> {
    fn from(value: UniqueEntityId) -> Self {
        EntityIdRef::Id(value)
    }
}

impl From<&UniqueEntityId> for EntityIdRef<'_> {
    fn from(value: &UniqueEntityId) -> Self {
        EntityIdRef::Id(*value)
    }
}
