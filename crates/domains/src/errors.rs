//! # DomainError
//!
//! Centralized error handling for the task board core.
//! Every orchestrator step either succeeds or raises one of these kinds.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The kind of entity that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resource {
    User,
    Board,
    List,
    Card,
    Label,
    Member,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::User => "User",
            Resource::Board => "Board",
            Resource::List => "List",
            Resource::Card => "Card",
            Resource::Label => "Label",
            Resource::Member => "Member",
        };
        f.write_str(name)
    }
}

/// Failure reported by a collaborator behind a port (repository, store).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PortError(pub String);

impl PortError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Stable machine-readable code for each error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    ValidationError,
    AlreadyInState,
    DependencyFailure,
}

/// The primary error type for all board operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Resource missing (User, Board, List, Card, Label)
    #[error("{0} not found")]
    NotFound(Resource),

    /// Role or ownership check failed
    #[error("{0}")]
    AccessDenied(String),

    /// Malformed payload (empty title, bad color, duplicate positions...)
    #[error("{0}")]
    Validation(String),

    /// State transition into the state the entity is already in
    #[error("{0}")]
    AlreadyInState(String),

    /// A collaborator call (save/delete/log) was rejected
    #[error("dependency failure: {0}")]
    DependencyFailure(#[from] PortError),
}

impl DomainError {
    pub fn not_found(resource: Resource) -> Self {
        Self::NotFound(resource)
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn already_in_state(message: impl Into<String>) -> Self {
        Self::AlreadyInState(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AccessDenied(_) => ErrorKind::AccessDenied,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::AlreadyInState(_) => ErrorKind::AlreadyInState,
            Self::DependencyFailure(_) => ErrorKind::DependencyFailure,
        }
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, DomainError>;
