use std::{collections::HashMap, future::Future, sync::Arc};

use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

use crate::{
    error::RegistryError,
    handler::{DynActionHandler, TypedActionHandler},
    request::ActionRequest,
};

/// Action name to handler table for one verb category.
///
/// # Example
/// ```ignore
/// let get_actions = ActionRegistry::new()
///     .with("ping", ping)?
///     .with("search", search)?;
/// ```
pub struct ActionRegistry<V> {
    handlers: HashMap<String, Arc<dyn DynActionHandler<V>>>,
}

impl<V: Send + Sync + 'static> ActionRegistry<V> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<T, F, Fut, R>(
        &mut self,
        action: impl Into<String>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(Arc<V>, ActionRequest, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let action = action.into();
        if self.handlers.contains_key(&action) {
            return Err(RegistryError::AlreadyRegistered(action));
        }
        let typed = TypedActionHandler::<V, T, F>::new(action.clone(), handler);
        self.handlers.insert(action, Arc::new(typed));
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<T, F, Fut, R>(
        mut self,
        action: impl Into<String>,
        handler: F,
    ) -> Result<Self, RegistryError>
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(Arc<V>, ActionRequest, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.register(action, handler)?;
        Ok(self)
    }
}

impl<V> ActionRegistry<V> {
    pub fn get(&self, action: &str) -> Option<Arc<dyn DynActionHandler<V>>> {
        self.handlers.get(action).cloned()
    }

    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<String> {
        let mut actions: Vec<String> = self.handlers.keys().cloned().collect();
        actions.sort();
        actions
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<V: Send + Sync + 'static> Default for ActionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
