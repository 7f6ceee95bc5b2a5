//! # viaduct-router
//!
//! Route templates, request resolution, and reverse URL lookup.
//!
//! This crate provides:
//! - Path templates with `{name}` placeholders, per-name constraints, and
//!   `{name}?` optional segments
//! - Method-based resolution with first-registered-match-wins semantics
//! - Correct 405 (`Allow` union) and automatic OPTIONS answers from a
//!   single linear scan
//! - Trailing-slash canonicalization as an explicit redirect outcome
//! - Route groups with prefix, namespace, and filter inheritance
//! - Named routes with reverse URL generation
//!
//! ## Quick Start
//!
//! ```
//! use viaduct_router::{Method, Request, Response, Route, RouteMatch, Router, Routes};
//!
//! let routes = Routes::new()
//!     .get("/", |_req, _res, _params| Ok(Some(b"home".to_vec())))
//!     .add(
//!         Route::get("/users/{id}", |_req, _res, params| {
//!             let id = params.require("id")?;
//!             Ok(Some(format!("user {id}").into_bytes()))
//!         })
//!         .name("user.show")
//!         .when([("id", "[0-9]+")]),
//!     );
//!
//! let router = Router::new(&routes);
//! match router.route(Method::Get, "/users/42").unwrap() {
//!     RouteMatch::Matched { route, params } => {
//!         assert_eq!(route.route_name(), Some("user.show"));
//!         assert_eq!(params.get("id"), Some("42"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ## Resolution outcomes
//!
//! [`Router::route`] yields an explicit sum type rather than sentinel
//! routes: [`RouteMatch::Matched`] with bound parameters,
//! [`RouteMatch::Redirect`] when a trailing-slash route was hit without its
//! slash, or [`RouteMatch::HeadersOnly`] for automatic OPTIONS answers.
//! Unmatched paths and method mismatches are errors
//! ([`RouterError::PageNotFound`], [`RouterError::MethodNotAllowed`]) so
//! they can never be silently swallowed.
//!
//! ## Groups
//!
//! ```
//! use viaduct_router::{Group, Routes};
//!
//! let routes = Routes::new().group(
//!     Group::new().prefix("/api").namespace("api").before(["auth"]),
//!     |r| r.get("/users", |_, _, _| Ok(None)),
//! );
//! assert_eq!(routes.iter().next().unwrap().pattern(), "/api/users");
//! ```

mod error;
mod pattern;
mod request;
mod response;
mod route;
mod router;
mod routes;
mod url;

pub use error::{Result, RouterError};
pub use pattern::{PathPattern, DEFAULT_CONSTRAINT};
pub use request::{Method, PathParams, Request};
pub use response::Response;
pub use route::{Action, HandlerFn, Route};
pub use router::{RouteMatch, Router};
pub use routes::{Group, Routes};
pub use url::UrlGenerator;
