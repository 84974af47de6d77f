//! Typed action handlers and their object-safe form.
//!
//! A handler is any `async fn(Arc<V>, ActionRequest, T) -> R` where `T` is the action's
//! input schema and `R` is a response. [`TypedActionHandler`] erases `T`, `F` and `R` so
//! handlers of different shapes can live in one [`ActionRegistry`](crate::ActionRegistry).

use std::{future::Future, marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{error::DispatchError, request::ActionRequest};

#[async_trait]
pub trait DynActionHandler<V>: Send + Sync {
    /// Validate `data` against the handler's input type, then run it.
    async fn call(
        &self,
        view: Arc<V>,
        request: ActionRequest,
        data: Value,
    ) -> Result<Response, DispatchError>;

    fn action(&self) -> &str;
}

pub struct TypedActionHandler<V, T, F> {
    action: String,
    handler: F,
    _marker: PhantomData<fn(Arc<V>, T)>,
}

impl<V, T, F> TypedActionHandler<V, T, F> {
    pub fn new(action: impl Into<String>, handler: F) -> Self {
        Self {
            action: action.into(),
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<V, T, F, Fut, R> DynActionHandler<V> for TypedActionHandler<V, T, F>
where
    V: Send + Sync + 'static,
    T: DeserializeOwned + Send + 'static,
    F: Fn(Arc<V>, ActionRequest, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    async fn call(
        &self,
        view: Arc<V>,
        request: ActionRequest,
        data: Value,
    ) -> Result<Response, DispatchError> {
        let input: T =
            serde_json::from_value(data).map_err(|source| DispatchError::InvalidPayload {
                action: self.action.clone(),
                source,
            })?;
        let response = (self.handler)(view, request, input).await;
        Ok(response.into_response())
    }

    fn action(&self) -> &str {
        &self.action
    }
}
