//! The route collection and its registration surface.
//!
//! Routes are registered once at boot with a chainable builder; the
//! collection is immutable afterwards. Registration order is match
//! priority: the first route whose pattern matches wins.

use std::collections::HashMap;

use crate::error::Result;
use crate::request::{Method, PathParams, Request};
use crate::response::Response;
use crate::route::Route;

/// Registration context shared by every route inside a [`Routes::group`]
/// closure. Groups nest; inner context applies first.
#[derive(Debug, Clone, Default)]
pub struct Group {
    prefix: String,
    namespace: Option<String>,
    before: Vec<String>,
    after: Vec<String>,
}

impl Group {
    /// Creates an empty group context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a path prefix to every route in the group.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Qualifies controller resolution for every route in the group.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Before-filters inherited by every route in the group. They run
    /// before the route's own before-filters.
    #[must_use]
    pub fn before<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    /// After-filters inherited by every route in the group. They run after
    /// the route's own after-filters.
    #[must_use]
    pub fn after<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }
}

/// An ordered collection of routes plus a name index.
///
/// Duplicate route names and other registration mistakes panic: routing
/// tables are built once at boot and a broken table is a programming
/// error, not a runtime condition.
#[derive(Debug, Default)]
pub struct Routes {
    routes: Vec<Route>,
    names: HashMap<String, usize>,
}

impl Routes {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fully configured route.
    ///
    /// # Panics
    ///
    /// Panics if the route's name is already taken.
    #[must_use]
    pub fn add(mut self, route: Route) -> Self {
        self.push(route);
        self
    }

    /// Registers a GET route with an inline handler.
    #[must_use]
    pub fn get<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::get(pattern, handler))
    }

    /// Registers a POST route with an inline handler.
    #[must_use]
    pub fn post<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::post(pattern, handler))
    }

    /// Registers a PUT route with an inline handler.
    #[must_use]
    pub fn put<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::put(pattern, handler))
    }

    /// Registers a PATCH route with an inline handler.
    #[must_use]
    pub fn patch<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::patch(pattern, handler))
    }

    /// Registers a DELETE route with an inline handler.
    #[must_use]
    pub fn delete<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::delete(pattern, handler))
    }

    /// Registers a route for every method with an inline handler.
    #[must_use]
    pub fn all<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::all(pattern, handler))
    }

    /// Registers a route for an explicit method list with an inline
    /// handler.
    #[must_use]
    pub fn on<F>(
        self,
        methods: impl IntoIterator<Item = Method>,
        pattern: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.add(Route::on(methods, pattern, handler))
    }

    /// Registers every route added inside the closure with the group's
    /// prefix, namespace, and inherited filters applied.
    ///
    /// Groups nest: an inner group's context is applied before the outer
    /// one, so outer prefixes end up outermost on the pattern.
    #[must_use]
    pub fn group<F>(mut self, group: Group, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let inner = f(Self::new());
        for mut route in inner.routes {
            route.apply_group(
                &group.prefix,
                group.namespace.as_deref(),
                &group.before,
                &group.after,
            );
            self.push(route);
        }
        self
    }

    fn push(&mut self, route: Route) {
        if let Some(name) = route.route_name() {
            assert!(
                !self.names.contains_key(name),
                "duplicate route name `{name}`"
            );
            self.names.insert(name.to_string(), self.routes.len());
        }
        self.routes.push(route);
    }

    /// Looks a route up by name.
    pub fn find(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&i| &self.routes[i])
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Routes {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(
        _: &Request,
        _: &mut Response,
        _: &PathParams,
    ) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    #[test]
    fn registration_order_is_preserved() {
        let routes = Routes::new()
            .get("/a", noop)
            .post("/b", noop)
            .get("/c", noop);

        let patterns: Vec<&str> = routes.iter().map(Route::pattern).collect();
        assert_eq!(patterns, ["/a", "/b", "/c"]);
    }

    #[test]
    fn named_routes_are_indexed() {
        let routes = Routes::new()
            .add(Route::get("/users/{id}", noop).name("user.show"))
            .get("/anonymous", noop);

        assert!(routes.find("user.show").is_some());
        assert!(routes.find("missing").is_none());
        assert_eq!(routes.len(), 2);
    }

    #[test]
    #[should_panic(expected = "duplicate route name `home`")]
    fn duplicate_names_panic() {
        let _ = Routes::new()
            .add(Route::get("/", noop).name("home"))
            .add(Route::get("/index", noop).name("home"));
    }

    #[test]
    fn group_applies_prefix_and_filters() {
        let routes = Routes::new().group(
            Group::new().prefix("/api").namespace("api").before(["auth"]),
            |r| {
                r.get("/users", noop)
                    .add(Route::uses([Method::Get], "/posts", "Post", "index").before(["csrf"]))
            },
        );

        let patterns: Vec<&str> = routes.iter().map(Route::pattern).collect();
        assert_eq!(patterns, ["/api/users", "/api/posts"]);

        let post_route = routes.iter().nth(1).unwrap();
        assert_eq!(post_route.before_filters(), ["auth", "csrf"]);
        assert_eq!(post_route.controller_namespace(), Some("api"));
    }

    #[test]
    fn groups_nest() {
        let routes = Routes::new().group(Group::new().prefix("/api").namespace("api"), |r| {
            r.group(Group::new().prefix("/v1").namespace("v1"), |r| {
                r.add(Route::uses([Method::Get], "/users", "User", "index"))
            })
        });

        let route = routes.iter().next().unwrap();
        assert_eq!(route.pattern(), "/api/v1/users");
        assert_eq!(route.controller_namespace(), Some("api::v1"));
    }

    #[test]
    fn group_names_survive_merging() {
        let routes = Routes::new().group(Group::new().prefix("/api"), |r| {
            r.add(Route::get("/users", noop).name("users.index"))
        });

        let route = routes.find("users.index").unwrap();
        assert_eq!(route.pattern(), "/api/users");
    }
}
