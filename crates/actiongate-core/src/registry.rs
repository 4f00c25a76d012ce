//! Action registry: the mapping from action name to handler.
//!
//! The registry is assembled once through [`RegistryBuilder`] and is
//! read-only afterwards, so a single `Arc<ActionRegistry>` can be shared by
//! any number of concurrent dispatches.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ActionError, ConfigError};

/// Name of an action, the lookup key into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(String);

impl ActionName {
    pub fn new(name: impl Into<String>) -> Self {
        ActionName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ActionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Request parameters: every field of the request object except `action`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new(fields: Map<String, Value>) -> Self {
        Params(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string field, or a validation error naming the field.
    pub fn get_str(&self, key: &str) -> Result<&str, ActionError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ActionError::validation(format!(
                "field '{}' must be a string",
                key
            ))),
            None => Err(ActionError::validation(format!(
                "missing required field '{}'",
                key
            ))),
        }
    }

    /// Deserializes the parameters into a typed request.
    ///
    /// Shape mismatches become [`ActionError::Validation`].
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ActionError> {
        T::deserialize(Value::Object(self.0.clone()))
            .map_err(|e| ActionError::validation(e.to_string()))
    }
}

/// Type-erased action handler.
pub type Handler = Arc<dyn Fn(&Params) -> Result<Value, ActionError> + Send + Sync>;

/// Immutable mapping from [`ActionName`] to [`Handler`].
pub struct ActionRegistry {
    handlers: HashMap<ActionName, Handler>,
}

impl ActionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, action: &str) -> Option<&Handler> {
        self.handlers.get(action)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<&ActionName> {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.actions())
            .finish()
    }
}

/// Collects handlers and validates them into an [`ActionRegistry`].
///
/// Errors are deferred to [`RegistryBuilder::build`] so registration can be
/// written as one chained expression.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<ActionName, Handler>,
    error: Option<ConfigError>,
}

impl RegistryBuilder {
    /// Registers `handler` under `name`.
    ///
    /// The handler's return value is serialized to JSON when it runs; a value
    /// that cannot be serialized is reported as [`ActionError::Generic`].
    pub fn action<T, F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        T: Serialize,
        F: Fn(&Params) -> Result<T, ActionError> + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return self;
        }
        let name = name.into();
        if name.is_empty() {
            self.error = Some(ConfigError::EmptyActionName);
            return self;
        }
        let key = ActionName::new(name);
        if self.handlers.contains_key(&key) {
            self.error = Some(ConfigError::DuplicateAction(key.0));
            return self;
        }
        let erased: Handler = Arc::new(move |params: &Params| -> Result<Value, ActionError> {
            let value = handler(params)?;
            serde_json::to_value(value).map_err(ActionError::other)
        });
        self.handlers.insert(key, erased);
        self
    }

    pub fn build(self) -> Result<ActionRegistry, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.handlers.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        Ok(ActionRegistry {
            handlers: self.handlers,
        })
    }
}
