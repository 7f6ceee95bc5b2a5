//! Named filter registry and the priority orderer.

use std::collections::HashMap;
use std::sync::Arc;

use viaduct_router::{PathParams, Request, Response, Result, RouterError};

/// Priority assumed for any filter without an override.
///
/// Callers push a filter ahead of the pack with a priority below 100, or
/// behind it with one above, without having to know what else participates.
pub const DEFAULT_PRIORITY: i32 = 100;

/// A filter callable.
///
/// In the before position, `Ok(Some(body))` short-circuits the pipeline:
/// the value becomes the response body and nothing further runs. In the
/// after position the return value is ignored.
pub type FilterFn =
    Arc<dyn Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>> + Send + Sync>;

/// Name → filter registry with per-name priority overrides.
///
/// Built at boot, read-only afterwards. Ordering happens only when a
/// per-request list is assembled, never at registration, so priority
/// changes apply retroactively without re-registration.
#[derive(Default)]
pub struct Filters {
    filters: HashMap<String, FilterFn>,
    priorities: HashMap<String, i32>,
}

impl Filters {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter under a name. Re-registration overwrites.
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Request, &mut Response, &PathParams) -> Result<Option<Vec<u8>>>
            + Send
            + Sync
            + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Replaces the priority overrides wholesale.
    pub fn set_priority(&mut self, priorities: HashMap<String, i32>) {
        self.priorities = priorities;
    }

    /// Clears every priority override.
    pub fn reset_priority(&mut self) {
        self.priorities.clear();
    }

    /// Returns the priority for a name: its override, or
    /// [`DEFAULT_PRIORITY`].
    pub fn priority(&self, name: &str) -> i32 {
        self.priorities
            .get(name)
            .copied()
            .unwrap_or(DEFAULT_PRIORITY)
    }

    /// Resolves a filter by name.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownFilter`] when nothing is registered
    /// under the name.
    pub fn resolve(&self, name: &str) -> Result<FilterFn> {
        self.filters
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::UnknownFilter(name.to_string()))
    }

    /// Reorders a per-request (name, value) list by priority.
    ///
    /// Stable ascending sort: lower priorities run earlier, equal
    /// priorities keep their original relative order.
    pub fn order_by_priority<T>(&self, mut entries: Vec<(String, T)>) -> Vec<(String, T)> {
        entries.sort_by_key(|(name, _)| self.priority(name));
        entries
    }
}

impl std::fmt::Debug for Filters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filters")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("priorities", &self.priorities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<(String, ())> {
        names.iter().map(|n| ((*n).to_string(), ())).collect()
    }

    fn order(filters: &Filters, names: &[&str]) -> Vec<String> {
        filters
            .order_by_priority(named(names))
            .into_iter()
            .map(|(n, ())| n)
            .collect()
    }

    #[test]
    fn default_priority_places_unprioritized_between_overrides() {
        let mut filters = Filters::new();
        filters.set_priority(HashMap::from([
            ("foo".to_string(), 1),
            ("baz".to_string(), 2),
            ("yyy".to_string(), 101),
        ]));

        assert_eq!(
            order(&filters, &["bar", "foo", "bax", "yyy", "baz"]),
            ["foo", "baz", "bar", "bax", "yyy"]
        );
    }

    #[test]
    fn default_priority_is_pinned_to_100() {
        let filters = Filters::new();
        assert_eq!(DEFAULT_PRIORITY, 100);
        assert_eq!(filters.priority("anything"), 100);
    }

    #[test]
    fn ties_preserve_original_order() {
        let mut filters = Filters::new();
        filters.set_priority(HashMap::from([
            ("a".to_string(), 5),
            ("b".to_string(), 5),
            ("c".to_string(), 5),
        ]));

        assert_eq!(order(&filters, &["c", "a", "b"]), ["c", "a", "b"]);
    }

    #[test]
    fn set_priority_replaces_wholesale_and_reset_clears() {
        let mut filters = Filters::new();
        filters.set_priority(HashMap::from([("old".to_string(), 1)]));
        filters.set_priority(HashMap::from([("new".to_string(), 1)]));
        assert_eq!(filters.priority("old"), DEFAULT_PRIORITY);
        assert_eq!(filters.priority("new"), 1);

        filters.reset_priority();
        assert_eq!(filters.priority("new"), DEFAULT_PRIORITY);
    }

    #[test]
    fn registration_overwrites() {
        let mut filters = Filters::new();
        filters.register("auth", |_, _, _| Ok(Some(b"first".to_vec())));
        filters.register("auth", |_, _, _| Ok(Some(b"second".to_vec())));

        let filter = filters.resolve("auth").unwrap();
        let req = Request::get("/");
        let mut res = Response::ok();
        let body = filter(&req, &mut res, &PathParams::new()).unwrap();
        assert_eq!(body.as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn unknown_filter_fails_resolution() {
        let filters = Filters::new();
        assert!(matches!(
            filters.resolve("nope"),
            Err(RouterError::UnknownFilter(name)) if name == "nope"
        ));
    }
}
