//! The application facade: owns the boot-time registries and speaks the
//! wire contract.

use tracing::{debug, warn};

use viaduct_router::{Method, Request, Response, Router, RouterError, Routes};

use crate::controller::Controllers;
use crate::dispatcher::Dispatcher;
use crate::filters::Filters;
use crate::inject::Injector;

/// Owns the routing table, filter and controller registries, and the
/// dependency map; resolves and dispatches one request at a time.
///
/// All registries are explicitly constructed and owned here, with no
/// ambient globals. Build the `App` once at boot; afterwards it is read-only and
/// safe to share across request-handling threads.
#[derive(Debug)]
pub struct App {
    routes: Routes,
    filters: Filters,
    controllers: Controllers,
    injector: Injector,
}

impl App {
    /// Creates an application over a route collection, with empty filter,
    /// controller, and dependency registries.
    pub fn new(routes: Routes) -> Self {
        Self {
            routes,
            filters: Filters::new(),
            controllers: Controllers::new(),
            injector: Injector::new(),
        }
    }

    /// Installs the filter registry.
    #[must_use]
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Installs the controller registry.
    #[must_use]
    pub fn controllers(mut self, controllers: Controllers) -> Self {
        self.controllers = controllers;
        self
    }

    /// Installs the dependency map.
    #[must_use]
    pub fn injector(mut self, injector: Injector) -> Self {
        self.injector = injector;
        self
    }

    /// Returns the route collection, e.g. for reverse URL generation.
    pub const fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Handles one request: resolve, dispatch, and translate failures to
    /// wire responses.
    ///
    /// Unmatched paths become 404, method mismatches become 405 with a
    /// complete `Allow` header, trailing-slash mismatches become 301, and
    /// automatic OPTIONS answers carry `Allow` with an empty body.
    pub fn handle(&self, req: &Request) -> Response {
        let router = Router::new(&self.routes);
        let outcome = match router.route(req.method, &req.path) {
            Ok(outcome) => outcome,
            Err(RouterError::PageNotFound { .. }) => {
                debug!(method = %req.method, path = %req.path, "404");
                return Response::not_found();
            }
            Err(RouterError::MethodNotAllowed { allowed, .. }) => {
                debug!(method = %req.method, path = %req.path, "405");
                return Response::method_not_allowed().header("Allow", Method::join(&allowed));
            }
            Err(e) => return self.failure(req, &e),
        };

        let mut res = Response::ok();
        let dispatcher = Dispatcher::new(&self.filters, &self.controllers, &self.injector);
        match dispatcher.dispatch(&outcome, req, &mut res) {
            Ok(()) => res,
            Err(e) => self.failure(req, &e),
        }
    }

    fn failure(&self, req: &Request, err: &RouterError) -> Response {
        match err {
            // Routing-configuration mistakes surface as NotFound.
            RouterError::MissingParameter(_)
            | RouterError::UnknownController(_)
            | RouterError::UnknownAction { .. } => {
                warn!(method = %req.method, path = %req.path, error = %err, "misconfigured route");
                Response::not_found()
            }
            _ => {
                warn!(method = %req.method, path = %req.path, error = %err, "dispatch failed");
                Response::internal_server_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_method_not_allowed_wire_mapping() {
        let routes = Routes::new().post("/things", |_, _, _| Ok(Some(b"made".to_vec())));
        let app = App::new(routes);

        let res = app.handle(&Request::get("/missing"));
        assert_eq!(res.status, 404);

        let res = app.handle(&Request::get("/things"));
        assert_eq!(res.status, 405);
        assert_eq!(res.get_header("Allow"), Some("POST,OPTIONS"));
    }

    #[test]
    fn options_answer_has_allow_and_empty_body() {
        let routes = Routes::new().post("/things", |_, _, _| Ok(Some(b"made".to_vec())));
        let app = App::new(routes);

        let res = app.handle(&Request::options("/things"));
        assert_eq!(res.status, 200);
        assert_eq!(res.get_header("Allow"), Some("POST,OPTIONS"));
        assert!(res.body.is_empty());
    }

    #[test]
    fn trailing_slash_mismatch_redirects() {
        let routes = Routes::new().get("/docs/", |_, _, _| Ok(Some(b"docs".to_vec())));
        let app = App::new(routes);

        let res = app.handle(&Request::get("/docs"));
        assert_eq!(res.status, 301);
        assert_eq!(res.get_header("Location"), Some("/docs/"));
        assert!(res.body.is_empty());
    }

    #[test]
    fn unknown_controller_maps_to_not_found() {
        let routes = Routes::new().add(viaduct_router::Route::uses(
            [Method::Get],
            "/ghost",
            "Ghost",
            "index",
        ));
        let app = App::new(routes);

        let res = app.handle(&Request::get("/ghost"));
        assert_eq!(res.status, 404);
    }

    #[test]
    fn unknown_filter_maps_to_server_error() {
        let routes = Routes::new()
            .add(viaduct_router::Route::get("/x", |_, _, _| Ok(None)).before(["nope"]));
        let app = App::new(routes);

        let res = app.handle(&Request::get("/x"));
        assert_eq!(res.status, 500);
    }
}
