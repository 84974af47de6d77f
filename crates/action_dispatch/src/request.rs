use std::collections::HashMap;

use axum::http::{HeaderMap, Method, Uri};
use shared::domain::ActionMethod;

/// The request as seen by an action handler or a page view.
///
/// `route_params` holds the captures of the mounted path pattern, e.g. `board` for
/// `/boards/:board`.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub route_params: HashMap<String, String>,
}

impl ActionRequest {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            route_params: HashMap::new(),
        }
    }

    pub fn with_route_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_params.insert(key.into(), value.into());
        self
    }

    /// The action table this request's verb dispatches through.
    pub fn action_method(&self) -> ActionMethod {
        ActionMethod::from_verb(self.method.as_str())
    }

    pub fn route_param(&self, key: &str) -> Option<&str> {
        self.route_params.get(key).map(String::as_str)
    }
}
