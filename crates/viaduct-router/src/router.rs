//! Request resolution.
//!
//! The router is a stateless algorithm over a borrowed [`Routes`]
//! collection: one linear pass in registration order, first pattern match
//! wins, with 405 and automatic-OPTIONS semantics derived from the same
//! pass.

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::request::{Method, PathParams};
use crate::route::Route;
use crate::routes::Routes;

/// A terminal resolution outcome.
#[derive(Debug)]
pub enum RouteMatch<'r> {
    /// A route matched; captured parameters are bound.
    Matched {
        /// The matched route.
        route: &'r Route,
        /// Parameters captured from the path.
        params: PathParams,
    },
    /// The path matched a trailing-slash route without its slash. Carries
    /// only the canonical target path; the caller redirects.
    Redirect {
        /// The path with the trailing slash appended.
        target: String,
    },
    /// An automatic OPTIONS answer: headers only, no action, no filters,
    /// empty body.
    HeadersOnly {
        /// The headers to merge, always exactly one `Allow` entry.
        headers: Vec<(String, String)>,
    },
}

/// Resolves `(method, path)` pairs against a route collection.
#[derive(Debug, Clone, Copy)]
pub struct Router<'r> {
    routes: &'r Routes,
}

impl<'r> Router<'r> {
    /// Creates a router over a collection.
    pub const fn new(routes: &'r Routes) -> Self {
        Self { routes }
    }

    /// Resolves a request to one of the terminal outcomes.
    ///
    /// # Errors
    ///
    /// - [`RouterError::PageNotFound`] when no pattern matches the path.
    /// - [`RouterError::MethodNotAllowed`] when at least one pattern
    ///   matches but none accepts the method; carries the ordered union of
    ///   every accepted method, OPTIONS included.
    /// - [`RouterError::InvalidPattern`] when a route's template fails to
    ///   compile lazily.
    pub fn route(&self, method: Method, path: &str) -> Result<RouteMatch<'r>> {
        let mut allowed: Vec<Method> = Vec::new();
        let mut path_matched = false;

        for route in self.routes {
            let matcher = route.matcher()?;
            let Some(params) = matcher.captures(path) else {
                continue;
            };
            path_matched = true;

            if !path.ends_with('/')
                && route.has_trailing_slash()
                && (route.allows(method) || method == Method::Options)
            {
                let target = format!("{path}/");
                debug!(%method, path, target, "redirect to canonical path");
                return Ok(RouteMatch::Redirect { target });
            }

            if route.allows(method) {
                debug!(%method, path, pattern = route.pattern(), "route matched");
                return Ok(RouteMatch::Matched { route, params });
            }

            for m in route.allowed_methods() {
                if !allowed.contains(&m) {
                    allowed.push(m);
                }
            }
        }

        if path_matched {
            if method == Method::Options {
                let allow = Method::join(&allowed);
                debug!(path, allow, "automatic OPTIONS answer");
                return Ok(RouteMatch::HeadersOnly {
                    headers: vec![("Allow".to_string(), allow)],
                });
            }
            debug!(%method, path, ?allowed, "method not allowed");
            return Err(RouterError::MethodNotAllowed {
                method,
                path: path.to_string(),
                allowed,
            });
        }

        debug!(%method, path, "no route matched");
        Err(RouterError::PageNotFound {
            method,
            path: path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{PathParams, Request};
    use crate::response::Response;
    use crate::route::Route;

    fn noop(
        _: &Request,
        _: &mut Response,
        _: &PathParams,
    ) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn collection() -> Routes {
        Routes::new()
            .get("/", noop)
            .get("/users/{id}", noop)
            .post("/users", noop)
            .get("/about/", noop)
    }

    #[test]
    fn matched_binds_params() {
        let routes = collection();
        let router = Router::new(&routes);

        match router.route(Method::Get, "/users/42").unwrap() {
            RouteMatch::Matched { route, params } => {
                assert_eq!(route.pattern(), "/users/{id}");
                assert_eq!(params.get("id"), Some("42"));
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn first_registered_match_wins() {
        let routes = Routes::new()
            .add(Route::get("/users/{id}", noop).name("first"))
            .add(Route::get("/users/{slug}", noop).name("second"));
        let router = Router::new(&routes);

        match router.route(Method::Get, "/users/42").unwrap() {
            RouteMatch::Matched { route, .. } => {
                assert_eq!(route.route_name(), Some("first"));
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_path_is_not_found() {
        let routes = collection();
        let router = Router::new(&routes);

        assert!(matches!(
            router.route(Method::Get, "/missing"),
            Err(RouterError::PageNotFound { .. })
        ));
    }

    #[test]
    fn wrong_method_is_method_not_allowed_with_union() {
        let routes = collection();
        let router = Router::new(&routes);

        match router.route(Method::Post, "/users/42") {
            Err(RouterError::MethodNotAllowed { allowed, .. }) => {
                assert_eq!(allowed, [Method::Get, Method::Options]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn allowed_union_spans_routes_on_the_same_path() {
        let routes = Routes::new()
            .get("/things", noop)
            .put("/things", noop);
        let router = Router::new(&routes);

        match router.route(Method::Delete, "/things") {
            Err(RouterError::MethodNotAllowed { allowed, .. }) => {
                assert_eq!(allowed, [Method::Get, Method::Options, Method::Put]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn options_gets_headers_only_answer() {
        let routes = collection();
        let router = Router::new(&routes);

        match router.route(Method::Options, "/users").unwrap() {
            RouteMatch::HeadersOnly { headers } => {
                assert_eq!(headers, [("Allow".to_string(), "POST,OPTIONS".to_string())]);
            }
            other => panic!("expected HeadersOnly, got {other:?}"),
        }
    }

    #[test]
    fn explicit_options_route_takes_precedence() {
        let routes = Routes::new()
            .get("/things", noop)
            .add(Route::options("/things", noop).name("things.options"));
        let router = Router::new(&routes);

        match router.route(Method::Options, "/things").unwrap() {
            RouteMatch::Matched { route, .. } => {
                assert_eq!(route.route_name(), Some("things.options"));
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn trailing_slash_route_redirects_bare_path() {
        let routes = collection();
        let router = Router::new(&routes);

        match router.route(Method::Get, "/about").unwrap() {
            RouteMatch::Redirect { target } => assert_eq!(target, "/about/"),
            other => panic!("expected Redirect, got {other:?}"),
        }

        assert!(matches!(
            router.route(Method::Get, "/about/").unwrap(),
            RouteMatch::Matched { .. }
        ));
    }

    #[test]
    fn redirect_requires_an_allowed_method() {
        let routes = Routes::new().get("/about/", noop);
        let router = Router::new(&routes);

        assert!(matches!(
            router.route(Method::Post, "/about"),
            Err(RouterError::MethodNotAllowed { .. })
        ));
    }

    #[test]
    fn invalid_lazy_pattern_surfaces() {
        let routes = Routes::new().add(Route::get("/x/{id}", noop).when([("id", "[0-9")]));
        let router = Router::new(&routes);

        assert!(matches!(
            router.route(Method::Get, "/x/1"),
            Err(RouterError::InvalidPattern(_))
        ));
    }
}
