//! The per-request execution pipeline.
//!
//! One dispatch call renders one resolution outcome into one response:
//! extra headers first, then priority-ordered before-filters and the
//! controller's before-hook (either may short-circuit), then the action,
//! then after-filters and the after-hook for side effects. Errors from
//! filters and actions propagate untranslated.

use tracing::{debug, trace};

use viaduct_router::{
    Action, PathParams, Request, Response, Result, Route, RouteMatch,
};

use crate::controller::Controllers;
use crate::filters::{FilterFn, Filters};
use crate::inject::Injector;

/// Executes resolution outcomes against a request/response pair.
///
/// Holds no state of its own; everything it touches is borrowed from the
/// boot-time registries.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    filters: &'a Filters,
    controllers: &'a Controllers,
    injector: &'a Injector,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over the boot-time registries.
    pub const fn new(
        filters: &'a Filters,
        controllers: &'a Controllers,
        injector: &'a Injector,
    ) -> Self {
        Self {
            filters,
            controllers,
            injector,
        }
    }

    /// Renders one resolution outcome into the response.
    ///
    /// # Errors
    ///
    /// Propagates filter and action errors unmodified, plus the
    /// configuration errors described on [`crate::Controller::call`] and
    /// [`Filters::resolve`].
    pub fn dispatch(
        &self,
        outcome: &RouteMatch<'_>,
        req: &Request,
        res: &mut Response,
    ) -> Result<()> {
        match outcome {
            RouteMatch::Redirect { target } => {
                debug!(target, "dispatching redirect");
                res.set_status(301);
                res.set_header("Location", target);
                Ok(())
            }
            RouteMatch::HeadersOnly { headers } => {
                trace!("dispatching headers-only answer");
                for (name, value) in headers {
                    res.set_header(name, value);
                }
                Ok(())
            }
            RouteMatch::Matched { route, params } => self.run(route, params, req, res),
        }
    }

    fn run(
        &self,
        route: &Route,
        params: &PathParams,
        req: &Request,
        res: &mut Response,
    ) -> Result<()> {
        for (name, value) in route.extra_headers() {
            res.set_header(name, value);
        }

        match route.action() {
            Action::Handler(handler) => {
                if let Some(body) = self.run_before(route, req, res, params)? {
                    res.set_body(body);
                    return Ok(());
                }
                if let Some(body) = handler(req, res, params)? {
                    res.set_body(body);
                }
                self.run_after(route, req, res, params)
            }
            Action::Controller { controller, action } => {
                let name = qualify(route.controller_namespace(), controller);
                let mut instance = self.controllers.construct(&name, self.injector)?;
                trace!(controller = %name, action, "controller constructed");

                if let Some(body) = self.run_before(route, req, res, params)? {
                    res.set_body(body);
                    return Ok(());
                }
                if let Some(hook) = instance.before_hook() {
                    if let Some(body) = hook.before(req, res)? {
                        debug!(controller = %name, "before-hook short-circuited");
                        res.set_body(body);
                        return Ok(());
                    }
                }

                if let Some(body) = instance.call(action, req, res, params)? {
                    res.set_body(body);
                }

                self.run_after(route, req, res, params)?;
                if let Some(hook) = instance.after_hook() {
                    hook.after(req, res);
                }
                Ok(())
            }
        }
    }

    /// Runs the route's before-filters in priority order. A `Some` return
    /// is the short-circuit body.
    fn run_before(
        &self,
        route: &Route,
        req: &Request,
        res: &mut Response,
        params: &PathParams,
    ) -> Result<Option<Vec<u8>>> {
        for (name, filter) in self.assemble(route.before_filters())? {
            trace!(filter = %name, "running before-filter");
            if let Some(body) = filter(req, res, params)? {
                debug!(filter = %name, "before-filter short-circuited");
                return Ok(Some(body));
            }
        }
        Ok(None)
    }

    /// Runs the route's after-filters in priority order, for side effects
    /// only.
    fn run_after(
        &self,
        route: &Route,
        req: &Request,
        res: &mut Response,
        params: &PathParams,
    ) -> Result<()> {
        for (name, filter) in self.assemble(route.after_filters())? {
            trace!(filter = %name, "running after-filter");
            let _ = filter(req, res, params)?;
        }
        Ok(())
    }

    /// Resolves a filter-name list and orders it by priority.
    fn assemble(&self, names: &[String]) -> Result<Vec<(String, FilterFn)>> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            resolved.push((name.clone(), self.filters.resolve(name)?));
        }
        Ok(self.filters.order_by_priority(resolved))
    }
}

fn qualify(namespace: Option<&str>, controller: &str) -> String {
    namespace.map_or_else(
        || controller.to_string(),
        |ns| format!("{ns}::{controller}"),
    )
}
