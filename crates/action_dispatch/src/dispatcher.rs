use std::sync::Arc;

use axum::response::Response;
use serde_json::{Map, Value};
use shared::{domain::ActionMethod, protocol::ActionQuery};
use tracing::debug;

use crate::{
    error::{DispatchError, PayloadLocation},
    handler::DynActionHandler,
    page::PageView,
    registry::ActionRegistry,
    request::ActionRequest,
};

/// Routes GET and POST requests of one view to its registered action handlers.
///
/// The two tables are separate namespaces: an action registered for POST only is
/// never reachable through a GET request and vice versa.
pub struct ActionDispatcher<V> {
    get_actions: ActionRegistry<V>,
    post_actions: ActionRegistry<V>,
}

impl<V> ActionDispatcher<V> {
    pub fn new(get_actions: ActionRegistry<V>, post_actions: ActionRegistry<V>) -> Self {
        Self {
            get_actions,
            post_actions,
        }
    }

    pub fn get_actions(&self) -> &ActionRegistry<V> {
        &self.get_actions
    }

    pub fn post_actions(&self) -> &ActionRegistry<V> {
        &self.post_actions
    }

    pub fn resolve_handler(
        &self,
        action: &str,
        method: ActionMethod,
    ) -> Option<Arc<dyn DynActionHandler<V>>> {
        match method {
            ActionMethod::Post => self.post_actions.get(action),
            ActionMethod::Get => self.get_actions.get(action),
        }
    }
}

impl<V: PageView> ActionDispatcher<V> {
    /// Run the GET action named in `query`, or render the default page when the
    /// query names no registered GET action.
    ///
    /// `data` is parsed before the action is looked up, so malformed JSON is
    /// rejected even for unknown actions.
    pub async fn handle_get(
        &self,
        view: Arc<V>,
        request: ActionRequest,
        query: ActionQuery,
    ) -> Result<Response, DispatchError> {
        let data = match query.data.as_deref() {
            Some(raw) => serde_json::from_str::<Value>(raw).map_err(|source| {
                DispatchError::MalformedJson {
                    location: PayloadLocation::QueryData,
                    source,
                }
            })?,
            None => Value::Null,
        };

        let handler = query
            .action
            .as_deref()
            .and_then(|action| self.resolve_handler(action, ActionMethod::Get));

        match handler {
            Some(handler) => {
                debug!(
                    action = handler.action(),
                    method = %request.action_method(),
                    "dispatching action"
                );
                handler.call(view, request, data).await
            }
            None => {
                debug!(action = ?query.action, "no GET action matched; rendering page");
                render_default(view.as_ref(), &request).await
            }
        }
    }

    /// Run the POST action named in a `{"action": ..., "data": ...}` body.
    ///
    /// Unlike GET there is no fallback: an unregistered action is
    /// [`DispatchError::ActionNotFound`].
    pub async fn handle_post(
        &self,
        view: Arc<V>,
        request: ActionRequest,
        body: &[u8],
    ) -> Result<Response, DispatchError> {
        let mut envelope: Map<String, Value> =
            serde_json::from_slice(body).map_err(|source| DispatchError::MalformedJson {
                location: PayloadLocation::RequestBody,
                source,
            })?;

        let action = envelope
            .remove("action")
            .ok_or(DispatchError::MissingField("action"))?;
        let data = envelope
            .remove("data")
            .ok_or(DispatchError::MissingField("data"))?;
        let Value::String(action) = action else {
            return Err(DispatchError::InvalidField {
                field: "action",
                expected: "a string",
            });
        };

        let Some(handler) = self.resolve_handler(&action, ActionMethod::Post) else {
            debug!(%action, method = %request.action_method(), "no POST action matched");
            return Err(DispatchError::ActionNotFound(action));
        };

        debug!(%action, method = %request.action_method(), "dispatching action");
        handler.call(view, request, data).await
    }
}

async fn render_default<V: PageView>(
    view: &V,
    request: &ActionRequest,
) -> Result<Response, DispatchError> {
    let context = view
        .get_context_data(request)
        .await
        .map_err(DispatchError::Render)?;
    view.render_to_response(context)
        .map_err(DispatchError::Render)
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
