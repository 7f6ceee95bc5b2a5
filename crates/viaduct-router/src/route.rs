//! A single pattern → action binding.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::pattern::PathPattern;
use crate::request::{Method, PathParams, Request};
use crate::response::Response;

/// An inline route handler.
///
/// Receives the request, the response being populated, and the parameters
/// captured from the path. Returning `Ok(Some(body))` sets the response
/// body; `Ok(None)` leaves it to whatever the handler wrote itself.
pub type HandlerFn =
    Arc<dyn Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>> + Send + Sync>;

/// What a route runs when it matches.
#[derive(Clone)]
pub enum Action {
    /// An inline closure.
    Handler(HandlerFn),
    /// A named controller action, resolved through the controller registry
    /// at dispatch time.
    Controller {
        /// Controller name, qualified by the route's namespace on dispatch.
        controller: String,
        /// Action (method) name on the controller.
        action: String,
    },
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::Controller { controller, action } => {
                write!(f, "Controller({controller}::{action})")
            }
        }
    }
}

/// An immutable pattern → action binding.
///
/// Built once at registration time; the matcher compiles lazily on first
/// use and is cached for the life of the route.
#[derive(Debug)]
pub struct Route {
    methods: Vec<Method>,
    pattern: String,
    constraints: HashMap<String, String>,
    action: Action,
    name: Option<String>,
    namespace: Option<String>,
    before: Vec<String>,
    after: Vec<String>,
    extra_headers: Vec<(String, String)>,
    trailing_slash: bool,
    matcher: OnceLock<PathPattern>,
}

impl Route {
    fn with_action(
        methods: impl IntoIterator<Item = Method>,
        pattern: impl Into<String>,
        action: Action,
    ) -> Self {
        let mut deduped = Vec::new();
        for method in methods {
            if !deduped.contains(&method) {
                deduped.push(method);
            }
        }
        let pattern = pattern.into();
        let trailing_slash = derive_trailing_slash(&pattern);
        Self {
            methods: deduped,
            pattern,
            constraints: HashMap::new(),
            action,
            name: None,
            namespace: None,
            before: Vec::new(),
            after: Vec::new(),
            extra_headers: Vec::new(),
            trailing_slash,
            matcher: OnceLock::new(),
        }
    }

    /// Creates a route serving the given methods with an inline handler.
    pub fn on<F>(
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
        Self::with_action(methods, pattern, Action::Handler(Arc::new(handler)))
    }

    /// Creates a route serving the given methods with a controller action.
    pub fn uses(
        methods: impl IntoIterator<Item = Method>,
        pattern: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::with_action(
            methods,
            pattern,
            Action::Controller {
                controller: controller.into(),
                action: action.into(),
            },
        )
    }

    /// Creates a GET route with an inline handler.
    pub fn get<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on([Method::Get], pattern, handler)
    }

    /// Creates a POST route with an inline handler.
    pub fn post<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on([Method::Post], pattern, handler)
    }

    /// Creates a PUT route with an inline handler.
    pub fn put<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on([Method::Put], pattern, handler)
    }

    /// Creates a PATCH route with an inline handler.
    pub fn patch<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on([Method::Patch], pattern, handler)
    }

    /// Creates a DELETE route with an inline handler.
    pub fn delete<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on([Method::Delete], pattern, handler)
    }

    /// Creates an OPTIONS route with an inline handler.
    ///
    /// Explicitly registered OPTIONS routes take precedence over the
    /// automatic headers-only OPTIONS answer.
    pub fn options<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on([Method::Options], pattern, handler)
    }

    /// Creates a route serving every method with an inline handler.
    pub fn all<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        Self::on(
            [
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Patch,
                Method::Delete,
                Method::Head,
                Method::Options,
            ],
            pattern,
            handler,
        )
    }

    /// Names the route for reverse URL lookup. Names must be unique within
    /// a collection.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Registers placeholder constraints (name → regex fragment).
    ///
    /// Must be called at registration time; the matcher compiles with
    /// whatever constraints are present on first use.
    #[must_use]
    pub fn when<I, K, V>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, fragment) in constraints {
            self.constraints.insert(name.into(), fragment.into());
        }
        self
    }

    /// Appends before-filter names, run in declared order.
    #[must_use]
    pub fn before<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    /// Appends after-filter names, run in declared order.
    #[must_use]
    pub fn after<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds a header merged into every response this route produces.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Sets the namespace qualifying controller resolution.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Returns the methods this route is declared for.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Returns the methods this route answers, OPTIONS always included.
    pub fn allowed_methods(&self) -> Vec<Method> {
        let mut allowed = self.methods.clone();
        if !allowed.contains(&Method::Options) {
            allowed.push(Method::Options);
        }
        allowed
    }

    /// Returns `true` if the method is declared on this route.
    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Returns the original template string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the route name, if any.
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the controller namespace, if any.
    pub fn controller_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the before-filter names in run order.
    pub fn before_filters(&self) -> &[String] {
        &self.before
    }

    /// Returns the after-filter names in run order.
    pub fn after_filters(&self) -> &[String] {
        &self.after
    }

    /// Returns the headers merged into every response for this route.
    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    /// Returns `true` if the template ends in `/`.
    pub const fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Returns the action bound to this route.
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// Returns the compiled matcher, compiling it on first use.
    ///
    /// Compilation happens at most once per route; later calls return the
    /// cached matcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RouterError::InvalidPattern`] when the template or
    /// one of its constraints cannot be compiled.
    pub fn matcher(&self) -> Result<&PathPattern> {
        if let Some(compiled) = self.matcher.get() {
            return Ok(compiled);
        }
        let compiled = PathPattern::compile(&self.pattern, &self.constraints)?;
        Ok(self.matcher.get_or_init(|| compiled))
    }

    /// Applies a registration group's context: prefix, namespace, and
    /// inherited filters. Group befores run before the route's own; group
    /// afters run after the route's own.
    pub(crate) fn apply_group(
        &mut self,
        prefix: &str,
        namespace: Option<&str>,
        before: &[String],
        after: &[String],
    ) {
        if !prefix.is_empty() {
            self.pattern = format!("{prefix}{}", self.pattern);
            self.trailing_slash = derive_trailing_slash(&self.pattern);
        }
        if let Some(ns) = namespace {
            self.namespace = Some(match self.namespace.take() {
                Some(inner) => format!("{ns}::{inner}"),
                None => ns.to_string(),
            });
        }
        if !before.is_empty() {
            let mut merged = before.to_vec();
            merged.append(&mut self.before);
            self.before = merged;
        }
        self.after.extend_from_slice(after);
    }
}

fn derive_trailing_slash(pattern: &str) -> bool {
    pattern.len() > 1 && pattern.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Request, _: &mut Response, _: &PathParams) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    #[test]
    fn methods_are_deduplicated_in_order() {
        let route = Route::on([Method::Post, Method::Get, Method::Post], "/x", noop);
        assert_eq!(route.methods(), [Method::Post, Method::Get]);
    }

    #[test]
    fn allowed_methods_include_options() {
        let route = Route::get("/x", noop);
        assert_eq!(route.allowed_methods(), [Method::Get, Method::Options]);
        assert!(route.allows(Method::Get));
        assert!(!route.allows(Method::Options));
    }

    #[test]
    fn options_only_route_stays_options_only() {
        let route = Route::options("/x", noop);
        assert_eq!(route.allowed_methods(), [Method::Options]);
        assert!(route.allows(Method::Options));
    }

    #[test]
    fn matcher_compiles_at_most_once() {
        let route = Route::get("/users/{id}", noop);
        let first = route.matcher().unwrap();
        let second = route.matcher().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn when_constrains_the_matcher() {
        let route = Route::get("/foo/{id}", noop).when([("id", "[0-9]+")]);
        let matcher = route.matcher().unwrap();
        assert!(matcher.is_match("/foo/123"));
        assert!(!matcher.is_match("/foo/abc"));
    }

    #[test]
    fn trailing_slash_is_derived_from_pattern() {
        assert!(Route::get("/about/", noop).has_trailing_slash());
        assert!(!Route::get("/about", noop).has_trailing_slash());
        assert!(!Route::get("/", noop).has_trailing_slash());
    }

    #[test]
    fn group_context_is_applied() {
        let mut route = Route::uses([Method::Get], "/users", "User", "index")
            .before(["csrf"])
            .after(["log"]);
        route.apply_group(
            "/api",
            Some("api"),
            &["auth".to_string()],
            &["metrics".to_string()],
        );

        assert_eq!(route.pattern(), "/api/users");
        assert_eq!(route.controller_namespace(), Some("api"));
        assert_eq!(route.before_filters(), ["auth", "csrf"]);
        assert_eq!(route.after_filters(), ["log", "metrics"]);
    }

    #[test]
    fn nested_namespaces_compose() {
        let mut route = Route::uses([Method::Get], "/u", "User", "index");
        route.apply_group("", Some("admin"), &[], &[]);
        route.apply_group("", Some("api"), &[], &[]);
        assert_eq!(route.controller_namespace(), Some("api::admin"));
    }

    #[test]
    fn prefixing_root_yields_trailing_slash_route() {
        let mut route = Route::get("/", noop);
        route.apply_group("/api", None, &[], &[]);
        assert_eq!(route.pattern(), "/api/");
        assert!(route.has_trailing_slash());
    }
}
