//! Route registration and the per-request lifecycle.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::{Component, Path};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use http::{Method, StatusCode};
use minos_controller::{
    invoke_action, ActionContext, Controller, ControllerEvent, ControllerServices,
    DEFAULT_ERROR_MESSAGE,
};
use minos_core::{
    route_handler, ControllerRef, Flow, MinosError, MinosResult, Request, RequestContext,
    Response, RouteBinder, Routed, BROWSER_CONTEXT_HEADER,
};
use minos_filter::FilterChain;
use minos_router::{table, Action, PathClassifier, RoutePattern};

use crate::budget::WorkerBudget;
use crate::catalog::ControllerCatalog;
use crate::naming::{controller_parts, page_for, ERROR_URL};
use crate::process::ProcessControl;
use crate::registry::{ControllerDescriptor, ControllerRegistry};

/// Default limit for the filter chain plus the action: three minutes.
pub const DEFAULT_CONTROLLER_TIMEOUT: Duration = Duration::from_millis(180_000);

/// Pattern of the catch-all error route.
pub const ERROR_ROUTE_PATTERN: &str = "^(.*)$";

/// Dispatch settings.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Limit for the filter chain plus the action of one request.
    pub controller_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            controller_timeout: DEFAULT_CONTROLLER_TIMEOUT,
        }
    }
}

/// Binds discovered controllers to routes and runs each request through its
/// filters and action.
///
/// Cloning shares the same state.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    services: Arc<ControllerServices>,
    catalog: ControllerCatalog,
    classifier: PathClassifier,
    filters: FilterChain,
    budget: Arc<WorkerBudget>,
    process: Arc<dyn ProcessControl>,
    options: DispatchOptions,
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    services: Arc<ControllerServices>,
    catalog: ControllerCatalog,
    process: Arc<dyn ProcessControl>,
    classifier: PathClassifier,
    filters: FilterChain,
    budget: Option<Arc<WorkerBudget>>,
    options: DispatchOptions,
}

impl DispatcherBuilder {
    /// Uses a loaded filter chain.
    #[must_use]
    pub fn filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    /// Shares an existing request budget.
    #[must_use]
    pub fn budget(mut self, budget: Arc<WorkerBudget>) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Overrides dispatch options.
    #[must_use]
    pub fn options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides which controller sources are recognized.
    #[must_use]
    pub fn classifier(mut self, classifier: PathClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Builds the dispatcher.
    pub fn build(self) -> Dispatcher {
        let budget = self.budget.unwrap_or_else(|| {
            Arc::new(WorkerBudget::new(
                self.services.config().clone(),
                self.services.environment().is_worker(),
            ))
        });

        Dispatcher {
            inner: Arc::new(Inner {
                services: self.services,
                catalog: self.catalog,
                classifier: self.classifier,
                filters: self.filters,
                budget,
                process: self.process,
                options: self.options,
            }),
        }
    }
}

impl Dispatcher {
    /// Starts building a dispatcher.
    pub fn builder(
        services: Arc<ControllerServices>,
        catalog: ControllerCatalog,
        process: Arc<dyn ProcessControl>,
    ) -> DispatcherBuilder {
        DispatcherBuilder {
            services,
            catalog,
            process,
            classifier: PathClassifier::new(),
            filters: FilterChain::new(),
            budget: None,
            options: DispatchOptions::default(),
        }
    }

    /// Shared services.
    pub fn services(&self) -> &Arc<ControllerServices> {
        &self.inner.services
    }

    /// The filter chain requests run through.
    pub fn filters(&self) -> &FilterChain {
        &self.inner.filters
    }

    /// The request budget.
    pub fn budget(&self) -> &Arc<WorkerBudget> {
        &self.inner.budget
    }

    /// Dispatch options.
    pub fn options(&self) -> &DispatchOptions {
        &self.inner.options
    }

    /// Discovers the controllers below `root` and binds their routes.
    ///
    /// Nested controllers are bound before their parents. The `error`
    /// controller, when present, is bound last as a catch-all `GET` route.
    /// Controllers that fail to load are skipped after the process control
    /// hook ran. Returns the number of bound routes.
    ///
    /// # Errors
    ///
    /// Fails when the controllers directory cannot be read or the error route
    /// pattern is rejected.
    pub fn load(&self, binder: &mut dyn RouteBinder, root: &Path) -> MinosResult<usize> {
        let start = Instant::now();
        let registry = ControllerRegistry::new(
            root,
            self.inner.catalog.clone(),
            self.inner.services.environment().clone(),
            Arc::clone(&self.inner.process),
        )
        .with_classifier(self.inner.classifier.clone());

        let mut files = registry.discover()?;
        files.reverse();

        let mut bound = 0;
        for file in files {
            let Some(descriptor) = registry.load(&file) else {
                continue;
            };
            bound += self.build_routes(binder, &Arc::new(descriptor), &file);
        }

        if let Some(descriptor) = registry.load_error_controller() {
            let pattern = RoutePattern::regex(ERROR_ROUTE_PATTERN)
                .map_err(|e| MinosError::Internal(e.into()))?;
            self.register_route(
                binder,
                &Arc::new(descriptor),
                ERROR_URL,
                Method::GET,
                pattern,
                Action::Index,
            );
            bound += 1;
        }

        minos_telemetry::profile("Load controllers", start);
        tracing::info!(routes = bound, root = %root.display(), "controllers loaded");
        Ok(bound)
    }

    fn build_routes(
        &self,
        binder: &mut dyn RouteBinder,
        descriptor: &Arc<ControllerDescriptor>,
        file: &Path,
    ) -> usize {
        let url = table::fix_url(&source_url(file));
        let routes = table::routes_for_url(&url);
        let count = routes.len();

        for route in routes {
            self.register_route(
                binder,
                descriptor,
                &url,
                route.method,
                RoutePattern::path(route.url),
                route.action,
            );
        }
        count
    }

    /// Resolves the controller's filters for `(url, action)` and binds a
    /// handler for `method` requests matching `pattern`.
    pub fn register_route(
        &self,
        binder: &mut dyn RouteBinder,
        descriptor: &Arc<ControllerDescriptor>,
        url: &str,
        method: Method,
        pattern: RoutePattern,
        action: Action,
    ) {
        descriptor.add_filters_for_handler(url, action);
        tracing::trace!(%method, pattern = pattern.as_str(), %action, "binding route");

        let dispatcher = self.clone();
        let descriptor = Arc::clone(descriptor);
        let url: Arc<str> = Arc::from(url);

        binder.bind(
            method,
            pattern,
            route_handler(move |request, response| {
                let dispatcher = dispatcher.clone();
                let descriptor = Arc::clone(&descriptor);
                let url = Arc::clone(&url);
                async move {
                    dispatcher
                        .dispatch(&url, action, &descriptor, request, response)
                        .await
                }
            }),
        );
    }

    async fn dispatch(
        &self,
        url: &str,
        action: Action,
        descriptor: &ControllerDescriptor,
        request: Request,
        response: Response,
    ) -> Routed {
        let started_at = Instant::now();
        let (controller, filters) = self.controller_for_request(url, action, descriptor);

        self.inner.services.events().emit(ControllerEvent::RequestStarted {
            method: request.method().clone(),
            url: request.url().to_string(),
        });

        tracing::debug!(
            "{} {} START. PARAMS: {}, BODY: {}, QUERY: {}",
            request.method(),
            request.url(),
            serde_json::to_string(request.params()).unwrap_or_default(),
            request.body_value(),
            serde_json::to_string(&request.query()).unwrap_or_default()
        );

        self.inner.budget.increment(self.inner.process.as_ref());

        self.handle_request(url, action, started_at, controller, filters, request, response)
            .await
    }

    /// In development every request gets a fresh controller so source edits
    /// show up; otherwise the long-lived instance is reused.
    fn controller_for_request(
        &self,
        url: &str,
        action: Action,
        descriptor: &ControllerDescriptor,
    ) -> (Arc<dyn Controller>, Vec<String>) {
        if self.inner.services.environment().is_development() {
            match descriptor.reload() {
                Ok(fresh) => {
                    let filters = fresh.before_filters().for_action(action);
                    return (fresh, filters);
                }
                Err(error) => tracing::warn!(
                    controller = descriptor.key(),
                    error = %error,
                    "controller reload failed, using the loaded instance"
                ),
            }
        }

        (
            Arc::clone(descriptor.instance()),
            descriptor.get_filters(url, action),
        )
    }

    /// Runs one request through `filters` and the controller action.
    ///
    /// Attaches the request context first. Filter failures, action errors,
    /// panics and timeouts all go to the controller's error handler; nothing
    /// escapes to the caller. `response` is whatever earlier bindings left
    /// behind. Returns [`Routed::Next`] with the request and response when
    /// the action falls through.
    pub async fn handle_request(
        &self,
        url: &str,
        action: Action,
        started_at: Instant,
        controller: Arc<dyn Controller>,
        filters: Vec<String>,
        mut request: Request,
        response: Response,
    ) -> Routed {
        let pattern = request.route().unwrap_or(url).to_string();
        let parts = controller_parts(url, &pattern);
        let mut context = RequestContext::new(
            page_for(request.url()),
            ControllerRef::from_parts(parts, action.as_str()),
            started_at,
        );
        if let Some(browser_id) = request
            .header(BROWSER_CONTEXT_HEADER)
            .filter(|value| !value.is_empty())
        {
            context = context.with_browser_id(browser_id);
        }

        let controller_name = context.controller_name().to_string();
        tracing::info!(
            request_token = context.request_token(),
            browser_id = context.browser_id(),
            controller = %controller_name,
            action = %action,
            "Request for {controller_name}#{action}"
        );
        request.set_context(context);

        let mut ctx =
            ActionContext::with_response(request, response, Arc::clone(&self.inner.services));
        let timeout = self.inner.options.controller_timeout;

        let run = async {
            {
                let (request, response) = ctx.parts_mut();
                self.inner.filters.run(&filters, request, response).await?;
            }
            AssertUnwindSafe(async { invoke_action(controller.as_ref(), action, &mut ctx).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(MinosError::from_panic(payload)))
        };

        let outcome = match tokio::time::timeout(timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(MinosError::Timeout(timeout)),
        };

        let routed = match outcome {
            Ok(Flow::Handled) => Routed::Response(ctx.into_response()),
            Ok(Flow::Next) => {
                let (request, response) = ctx.into_parts();
                Routed::Next(request, response)
            }
            Err(error) => {
                minos_telemetry::metrics::record_error(&controller_name, error_kind(&error));
                self.report_error(controller.as_ref(), &mut ctx, error).await;
                Routed::Response(ctx.into_response())
            }
        };

        minos_telemetry::metrics::record_dispatch(
            &controller_name,
            action.as_str(),
            started_at.elapsed(),
        );
        routed
    }

    async fn report_error(
        &self,
        controller: &dyn Controller,
        ctx: &mut ActionContext,
        error: MinosError,
    ) {
        let handled = AssertUnwindSafe(async { controller.handle_error(ctx, error).await })
            .catch_unwind()
            .await;

        if let Err(payload) = handled {
            tracing::error!(
                error = %MinosError::from_panic(payload),
                "controller error handler panicked"
            );
        }

        if !ctx.response().is_sent() {
            let response = ctx.response_mut();
            response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.send_text(DEFAULT_ERROR_MESSAGE);
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog", &self.inner.catalog)
            .field("filters", &self.inner.filters)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// Metric label for an error.
fn error_kind(error: &MinosError) -> &'static str {
    match error {
        MinosError::FilterRejected { .. } => "filter",
        MinosError::Timeout(_) => "timeout",
        MinosError::Panicked(_) => "panic",
        MinosError::Render { .. } | MinosError::RenderHandled => "render",
        MinosError::NotFound(_) => "not_found",
        MinosError::Action(_) | MinosError::Internal(_) => "action",
        MinosError::ControllerLoad { .. } | MinosError::ModuleLoad { .. } => "load",
    }
}

/// A relative source path as a `/`-separated URL, extension kept.
fn source_url(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
