use thiserror::Error;

use super::{ports::ApiError, reorder::GestureError};
use crate::{
    domain::{error::DomainError, ordering::ListKind},
    infra::error::InfraError,
};

/// Failures of gestures and console commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Gesture(#[from] GestureError),
    #[error("the {0} list is not rendered")]
    ListNotRendered(ListKind),
    #[error("the {0} list is not on screen")]
    ListHidden(ListKind),
    #[error("no section could be shown for route `{0}`")]
    NoSection(String),
}

/// Failures of admin mutations. Every variant has already been reported to
/// the user through the notification sink when it is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("{action} failed: {source}")]
    Api {
        action: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("no page is selected")]
    NoPageSelected,
}

impl AdminError {
    pub fn api(action: &'static str, source: ApiError) -> Self {
        Self::Api { action, source }
    }
}

/// Top-level failure of a command-line run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
