//! Wrappers for deprecated, renamed, and relocated API functions.

use std::sync::Arc;

use serde_json::Value;

use crate::warn::warn_once;
use crate::{DeprecationError, Result};

/// A named, dynamically-typed endpoint on the shell's embedder-facing API
/// surface.
#[derive(Clone)]
pub struct ApiFunction {
    name: String,
    handler: Arc<dyn Fn(&[Value]) -> Value + Send + Sync>,
}

impl ApiFunction {
    /// Create an endpoint from a name and a handler.
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }

    /// Endpoint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the endpoint.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.handler)(args)
    }
}

impl std::fmt::Debug for ApiFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Wrap an endpoint slated for removal without a replacement.
///
/// Fails at construction when the endpoint is already gone. The wrapper
/// warns once, forwards the arguments, and swallows the return value.
pub fn remove_function(func: Option<ApiFunction>, removed_name: &str) -> Result<ApiFunction> {
    let Some(func) = func else {
        return Err(DeprecationError::InvalidFunction(removed_name.to_string()));
    };
    let notice = warn_once(&format!("{} function", func.name()), None);
    Ok(ApiFunction::new(func.name().to_string(), move |args| {
        notice.fire();
        func.call(args);
        Value::Null
    }))
}

/// Wrap an endpoint that lives on under a new name. Forwards arguments and
/// return value.
pub fn rename_function(func: ApiFunction, new_name: &str) -> ApiFunction {
    let notice = warn_once(
        &format!("{} function", func.name()),
        Some(&format!("{new_name} function")),
    );
    ApiFunction::new(func.name().to_string(), move |args| {
        notice.fire();
        func.call(args)
    })
}

/// Wrap an endpoint whose call shape changed, described by free-form usage
/// strings. Forwards arguments and return value.
pub fn move_api(func: ApiFunction, old_usage: &str, new_usage: &str) -> ApiFunction {
    let notice = warn_once(old_usage, Some(new_usage));
    ApiFunction::new(func.name().to_string(), move |args| {
        notice.fire();
        func.call(args)
    })
}
