use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, Method, Uri},
    response::Response,
    routing::get,
    Router,
};
use shared::protocol::ActionQuery;

use crate::{
    dispatcher::ActionDispatcher, error::DispatchError, page::PageView, request::ActionRequest,
};

/// A page view paired with its action tables, ready to be mounted on a router.
pub struct ActionView<V> {
    view: Arc<V>,
    dispatcher: ActionDispatcher<V>,
}

impl<V: PageView> ActionView<V> {
    pub fn new(view: V, dispatcher: ActionDispatcher<V>) -> Self {
        Self {
            view: Arc::new(view),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<V> {
        &self.dispatcher
    }

    /// Serve GET and POST for `path`. Captures in `path` reach handlers as route params.
    pub fn into_router(self, path: &str) -> Router {
        Router::new()
            .route(path, get(get_action::<V>).post(post_action::<V>))
            .with_state(Arc::new(self))
    }
}

async fn get_action<V: PageView>(
    State(state): State<Arc<ActionView<V>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Option<Path<HashMap<String, String>>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, DispatchError> {
    let Query(pairs) = pairs.map_err(DispatchError::MalformedQuery)?;
    let query = ActionQuery::from_pairs(pairs);
    let request = action_request(method, uri, headers, params);
    state
        .dispatcher
        .handle_get(state.view.clone(), request, query)
        .await
}

async fn post_action<V: PageView>(
    State(state): State<Arc<ActionView<V>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Option<Path<HashMap<String, String>>>,
    body: Bytes,
) -> Result<Response, DispatchError> {
    let request = action_request(method, uri, headers, params);
    state
        .dispatcher
        .handle_post(state.view.clone(), request, &body)
        .await
}

fn action_request(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Option<Path<HashMap<String, String>>>,
) -> ActionRequest {
    ActionRequest {
        method,
        uri,
        headers,
        route_params: params.map(|Path(params)| params).unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
