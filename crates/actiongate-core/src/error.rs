//! Error taxonomy raised by action handlers, plus configuration errors.
//!
//! [`ActionError`] is the closed set of failure kinds a handler may signal.
//! Every variant has exactly one guard in [`crate::guard`] that translates it
//! into a normalized [`crate::Failure`]. Handlers never format responses.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of the resource a resource-scoped error refers to.
///
/// Serialized untagged, so an integer id appears as a JSON number and a
/// string id as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(id) => write!(f, "{}", id),
            ResourceId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Int(id)
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        ResourceId::Int(i64::from(id))
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        ResourceId::Int(i64::from(id))
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::Str(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Str(id.to_string())
    }
}

/// Failure kinds a handler may signal.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Request parameters failed shape or schema validation.
    #[error("{message}")]
    Validation { message: String },

    /// A request parameter is present but not acceptable.
    #[error("{message}")]
    InvalidRequestParameter { message: String },

    #[error("resource ({resource_id}) not found")]
    ResourceNotFound { resource_id: ResourceId },

    #[error("resource ({resource_id}) does not belong to the project")]
    ResourceNotBelongsToProject { resource_id: ResourceId },

    #[error("action on resource ({resource_id}) is forbidden")]
    ResourceActionForbidden { resource_id: ResourceId },

    #[error("action on resource ({resource_id}) is unsupported")]
    ResourceActionUnsupported { resource_id: ResourceId },

    /// The resource is mid-transition; surfaced to callers as forbidden.
    #[error("resource ({resource_id}) is busy")]
    ResourceIsBusy { resource_id: ResourceId },

    /// A downstream provider rejected the action.
    ///
    /// `exception` and `stacktrace` are internal details: they are logged,
    /// and only returned to the caller in debug mode.
    #[error("provider action failed: {message}")]
    ProviderAction {
        message: String,
        exception: Option<String>,
        stacktrace: Option<String>,
    },

    /// Anything else. Surfaced as a server error.
    #[error("{message}")]
    Generic { message: String },
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        ActionError::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        ActionError::InvalidRequestParameter {
            message: message.into(),
        }
    }

    pub fn not_found(resource_id: impl Into<ResourceId>) -> Self {
        ActionError::ResourceNotFound {
            resource_id: resource_id.into(),
        }
    }

    pub fn not_belongs_to_project(resource_id: impl Into<ResourceId>) -> Self {
        ActionError::ResourceNotBelongsToProject {
            resource_id: resource_id.into(),
        }
    }

    pub fn forbidden(resource_id: impl Into<ResourceId>) -> Self {
        ActionError::ResourceActionForbidden {
            resource_id: resource_id.into(),
        }
    }

    pub fn unsupported(resource_id: impl Into<ResourceId>) -> Self {
        ActionError::ResourceActionUnsupported {
            resource_id: resource_id.into(),
        }
    }

    pub fn busy(resource_id: impl Into<ResourceId>) -> Self {
        ActionError::ResourceIsBusy {
            resource_id: resource_id.into(),
        }
    }

    pub fn provider(
        message: impl Into<String>,
        exception: Option<String>,
        stacktrace: Option<String>,
    ) -> Self {
        ActionError::ProviderAction {
            message: message.into(),
            exception,
            stacktrace,
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        ActionError::Generic {
            message: message.into(),
        }
    }

    /// Wraps an arbitrary error as an unclassified failure.
    pub fn other<E: std::error::Error>(err: E) -> Self {
        ActionError::generic(err.to_string())
    }

    /// The resource this error refers to, for resource-scoped kinds.
    pub fn resource_id(&self) -> Option<&ResourceId> {
        match self {
            ActionError::ResourceNotFound { resource_id }
            | ActionError::ResourceNotBelongsToProject { resource_id }
            | ActionError::ResourceActionForbidden { resource_id }
            | ActionError::ResourceActionUnsupported { resource_id }
            | ActionError::ResourceIsBusy { resource_id } => Some(resource_id),
            _ => None,
        }
    }
}

/// Errors detected while assembling the dispatcher or server at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No actions were registered.
    #[error("action registry is empty")]
    EmptyRegistry,

    #[error("action name must not be empty")]
    EmptyActionName,

    #[error("action '{0}' is registered more than once")]
    DuplicateAction(String),

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
