//! Request and response envelope codec.
//!
//! Inbound: a JSON object with a required string `action`; every other field
//! becomes a handler parameter. Outbound: `{retCode, message, data}`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ActionError;
use crate::failure::{Failure, RetCode};
use crate::registry::{ActionName, Params};

/// Decoded inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub action: ActionName,
    pub params: Params,
}

impl RequestEnvelope {
    /// Decodes a raw request body.
    ///
    /// Every shape problem is reported as [`ActionError::Validation`], so it
    /// is surfaced by the params guard as `RequestParamValidationError`.
    pub fn decode(body: &[u8]) -> Result<Self, ActionError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ActionError::validation("request body is empty"));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ActionError::validation(format!("malformed JSON: {}", e)))?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            _ => {
                return Err(ActionError::validation(
                    "request body must be a JSON object",
                ))
            }
        };
        let action = match fields.remove("action") {
            Some(Value::String(action)) if !action.is_empty() => ActionName::new(action),
            Some(Value::String(_)) => {
                return Err(ActionError::validation("field 'action' must not be empty"))
            }
            Some(_) => return Err(ActionError::validation("field 'action' must be a string")),
            None => return Err(ActionError::validation("missing required field 'action'")),
        };
        Ok(RequestEnvelope {
            action,
            params: Params::new(fields),
        })
    }
}

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub ret_code: RetCode,
    pub message: String,
    pub data: Map<String, Value>,
}

/// Key used when a non-object success value is wrapped.
pub const VALUE_KEY: &str = "value";

impl ResponseEnvelope {
    /// Encodes a handler's return value.
    ///
    /// Objects are used as-is, `null` becomes `{}`, anything else is wrapped
    /// as `{"value": ...}`.
    pub fn success(value: Value) -> Self {
        let data = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert(VALUE_KEY.to_string(), other);
                map
            }
        };
        ResponseEnvelope {
            ret_code: RetCode::Ok,
            message: String::new(),
            data,
        }
    }

    pub fn failure(failure: Failure) -> Self {
        let (ret_code, message, data) = failure.into_parts();
        ResponseEnvelope {
            ret_code,
            message,
            data,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ret_code == RetCode::Ok
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "retCode": self.ret_code.as_u32(),
            "message": self.message,
            "data": self.data,
        })
    }
}

impl From<Result<Value, Failure>> for ResponseEnvelope {
    fn from(result: Result<Value, Failure>) -> Self {
        match result {
            Ok(value) => ResponseEnvelope::success(value),
            Err(failure) => ResponseEnvelope::failure(failure),
        }
    }
}
