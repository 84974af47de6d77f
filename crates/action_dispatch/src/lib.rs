//! Action-based dispatch for page views.
//!
//! A page view answers plain GET requests by rendering itself. Mounting it through an
//! [`ActionView`] adds two static action tables on top: GET requests naming an action
//! in `?action=` (with optional JSON in `?data=`) and POST requests carrying
//! `{"action": ..., "data": ...}` are routed to the registered handler instead.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod page;
pub mod registry;
pub mod request;
pub mod view;

pub use dispatcher::ActionDispatcher;
pub use error::{DispatchError, PayloadLocation, RegistryError};
pub use handler::{DynActionHandler, TypedActionHandler};
pub use page::{Context, PageView};
pub use registry::ActionRegistry;
pub use request::ActionRequest;
pub use shared::domain::ActionMethod;
pub use view::ActionView;
