//! Reverse URL lookup over named routes.

use std::collections::HashMap;

use crate::error::{Result, RouterError};
use crate::routes::Routes;

/// Builds paths from route names, using the same placeholder, optional
/// segment, and trailing-slash rules as the matcher. Read-only consumer of
/// [`Routes`].
#[derive(Debug, Clone, Copy)]
pub struct UrlGenerator<'r> {
    routes: &'r Routes,
}

impl<'r> UrlGenerator<'r> {
    /// Creates a generator over a collection.
    pub const fn new(routes: &'r Routes) -> Self {
        Self { routes }
    }

    /// Builds the path for a named route.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownRouteName`] when no route carries the name.
    /// - [`RouterError::MissingParameter`] when a required placeholder has
    ///   no value.
    /// - [`RouterError::InvalidPattern`] when the route's template fails to
    ///   compile.
    pub fn to(&self, name: &str, params: &HashMap<String, String>) -> Result<String> {
        let route = self
            .routes
            .find(name)
            .ok_or_else(|| RouterError::UnknownRouteName(name.to_string()))?;
        route.matcher()?.reverse(params)
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

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn collection() -> Routes {
        Routes::new()
            .add(Route::get("/users/{id}", noop).name("user.show"))
            .add(Route::get("/posts/{id}/{slug}?", noop).name("post.show"))
            .add(Route::get("/about/", noop).name("about"))
    }

    #[test]
    fn builds_path_from_name() {
        let routes = collection();
        let url = UrlGenerator::new(&routes);
        assert_eq!(
            url.to("user.show", &params(&[("id", "42")])).unwrap(),
            "/users/42"
        );
    }

    #[test]
    fn optional_segment_is_omitted_without_value() {
        let routes = collection();
        let url = UrlGenerator::new(&routes);
        assert_eq!(
            url.to("post.show", &params(&[("id", "7")])).unwrap(),
            "/posts/7"
        );
        assert_eq!(
            url.to("post.show", &params(&[("id", "7"), ("slug", "hi")]))
                .unwrap(),
            "/posts/7/hi"
        );
    }

    #[test]
    fn trailing_slash_is_kept() {
        let routes = collection();
        let url = UrlGenerator::new(&routes);
        assert_eq!(url.to("about", &HashMap::new()).unwrap(), "/about/");
    }

    #[test]
    fn unknown_name_fails() {
        let routes = collection();
        let url = UrlGenerator::new(&routes);
        assert!(matches!(
            url.to("missing", &HashMap::new()),
            Err(RouterError::UnknownRouteName(name)) if name == "missing"
        ));
    }

    #[test]
    fn missing_required_parameter_fails() {
        let routes = collection();
        let url = UrlGenerator::new(&routes);
        assert!(matches!(
            url.to("user.show", &HashMap::new()),
            Err(RouterError::MissingParameter(name)) if name == "id"
        ));
    }
}
