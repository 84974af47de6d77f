use async_trait::async_trait;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::request::ActionRequest;

/// Template context handed from [`PageView::get_context_data`] to
/// [`PageView::render_to_response`].
pub type Context = Map<String, Value>;

/// The page a view renders when a GET request names no registered action.
#[async_trait]
pub trait PageView: Send + Sync + 'static {
    /// Build the context for the default page.
    async fn get_context_data(&self, request: &ActionRequest) -> anyhow::Result<Context>;

    /// Turn a context into the default page response.
    ///
    /// Renders the context as a JSON object unless overridden.
    fn render_to_response(&self, context: Context) -> anyhow::Result<Response> {
        Ok(Json(Value::Object(context)).into_response())
    }
}
