//! Typed errors for the parts of the engine a caller can get wrong.

use thiserror::Error;

/// Rejections raised while building a [`CraftProfile`](crate::profile::CraftProfile).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("craft profile id must not be empty")]
    EmptyId,
    #[error("craft profile name must not be empty")]
    EmptyName,
    #[error("flight time must be greater than zero seconds")]
    ZeroDuration,
}

/// Rejections raised by the read-only craft catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate craft id '{0}' in catalog")]
    DuplicateId(String),
    #[error("no craft with id '{0}' in catalog")]
    UnknownId(String),
    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),
}

/// Rejections raised synchronously by [`FlightClockEngine`](crate::engine::FlightClockEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    #[error("a countdown or alarm is already active")]
    SessionActive,
}
