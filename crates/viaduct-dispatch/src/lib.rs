//! # viaduct-dispatch
//!
//! The per-request execution side of viaduct: a named filter registry with
//! priority-based ordering, controllers with optional before/after hook
//! capabilities, a type-keyed dependency map, the dispatch pipeline, and
//! the `App` facade tying them to a `viaduct-router` route table.
//!
//! ## Quick Start
//!
//! ```
//! use viaduct_dispatch::{App, Filters};
//! use viaduct_router::{Request, Routes};
//!
//! let routes = Routes::new().get("/hello/{name}", |_req, _res, params| {
//!     let name = params.require("name")?;
//!     Ok(Some(format!("Hello, {name}!").into_bytes()))
//! });
//!
//! let mut filters = Filters::new();
//! filters.register("log", |_req, _res, _params| Ok(None));
//!
//! let app = App::new(routes).filters(filters);
//! let res = app.handle(&Request::get("/hello/world"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body_string().as_deref(), Some("Hello, world!"));
//! ```
//!
//! ## Pipeline
//!
//! For a matched route the dispatcher merges the route's extra headers,
//! runs the before-filters (stable-sorted by priority, default
//! [`DEFAULT_PRIORITY`]) and the controller's before-hook, where any
//! `Some` return short-circuits and becomes the body, then the action,
//! then the after-filters and after-hook for side effects. Redirect and
//! headers-only outcomes are rendered directly, without filters or
//! actions.

mod app;
mod controller;
mod dispatcher;
mod filters;
mod inject;

pub use app::App;
pub use controller::{AfterHook, BeforeHook, Controller, ControllerFactory, Controllers};
pub use dispatcher::Dispatcher;
pub use filters::{FilterFn, Filters, DEFAULT_PRIORITY};
pub use inject::Injector;
