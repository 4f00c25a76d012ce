//! Return codes and the normalized failure triple.
//!
//! A [`Failure`] is what a guard produces once it has classified an error:
//! a `(retCode, message, data)` triple that is final. It has no mutators, so
//! no outer layer can override the code chosen by the first classifier.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Reserved `retCode` values. The numbers are a wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetCode {
    Ok,
    RequestParamValidationError,
    RequestParamUnknownAction,
    ResourceNotFound,
    ResourceNotBelongsToProject,
    ResourceActionForbidden,
    ResourceActionUnsupported,
    ServerError,
    ProviderError,
}

impl RetCode {
    /// Every reserved code, in ascending numeric order.
    pub const ALL: [RetCode; 9] = [
        RetCode::Ok,
        RetCode::RequestParamValidationError,
        RetCode::RequestParamUnknownAction,
        RetCode::ResourceNotFound,
        RetCode::ResourceNotBelongsToProject,
        RetCode::ResourceActionForbidden,
        RetCode::ResourceActionUnsupported,
        RetCode::ServerError,
        RetCode::ProviderError,
    ];

    pub const fn as_u32(self) -> u32 {
        match self {
            RetCode::Ok => 0,
            RetCode::RequestParamValidationError => 4000,
            RetCode::RequestParamUnknownAction => 4010,
            RetCode::ResourceNotFound => 4104,
            RetCode::ResourceNotBelongsToProject => 4105,
            RetCode::ResourceActionForbidden => 4110,
            RetCode::ResourceActionUnsupported => 4111,
            RetCode::ServerError => 5000,
            RetCode::ProviderError => 5001,
        }
    }

    pub fn from_u32(code: u32) -> Option<Self> {
        RetCode::ALL.into_iter().find(|c| c.as_u32() == code)
    }
}

impl fmt::Display for RetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl Serialize for RetCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

/// Key carrying raw diagnostic text in debug mode.
pub const EXCEPTION_STR: &str = "exceptionStr";

/// Key carrying the offending resource id for resource-scoped failures.
pub const RESOURCE_ID: &str = "resourceId";

/// A normalized failure, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    code: RetCode,
    message: String,
    data: Map<String, Value>,
}

impl Failure {
    /// Creates a failure with empty diagnostic data.
    pub fn new(code: RetCode, message: impl Into<String>) -> Self {
        Failure {
            code,
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Creates a failure carrying the given diagnostic data.
    pub fn with_data(code: RetCode, message: impl Into<String>, data: Map<String, Value>) -> Self {
        Failure {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn code(&self) -> RetCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub(crate) fn into_parts(self) -> (RetCode, String, Map<String, Value>) {
        (self.code, self.message, self.data)
    }
}
